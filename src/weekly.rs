use crate::error::EngineError;
use crate::history::ListeningHistory;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Weeks covered by the series. ISO week 53 is left out.
pub const WEEKS: std::ops::RangeInclusive<u32> = 1..=52;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekPoint {
    pub week: u32,
    pub cumulative_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistSeries {
    pub artist: String,
    pub points: Vec<WeekPoint>,
}

impl ArtistSeries {
    pub fn total_hours(&self) -> f64 {
        self.points
            .last()
            .map(|point| point.cumulative_hours)
            .unwrap_or_default()
    }
}

impl ListeningHistory {
    pub fn cumulative_by_week(&self, n: usize) -> Result<Vec<ArtistSeries>, EngineError> {
        let artists: BTreeSet<String> = self
            .top_n_artists(n)?
            .into_iter()
            .map(|row| row.artist)
            .collect();
        Ok(self.cumulative_for(&artists))
    }

    pub(crate) fn cumulative_for(&self, artists: &BTreeSet<String>) -> Vec<ArtistSeries> {
        let mut weekly: BTreeMap<(&str, u32), f64> = BTreeMap::new();
        for event in self.kept() {
            if !WEEKS.contains(&event.iso_week) || !artists.contains(&event.artist_name) {
                continue;
            }
            *weekly
                .entry((event.artist_name.as_str(), event.iso_week))
                .or_default() += event.hours_played;
        }

        artists
            .iter()
            .map(|artist| {
                let mut running = 0.0;
                let points = WEEKS
                    .map(|week| {
                        running += weekly
                            .get(&(artist.as_str(), week))
                            .copied()
                            .unwrap_or_default();
                        WeekPoint {
                            week,
                            cumulative_hours: running,
                        }
                    })
                    .collect();
                ArtistSeries {
                    artist: artist.clone(),
                    points,
                }
            })
            .collect()
    }
}
