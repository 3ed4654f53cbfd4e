use crate::error::EngineError;
use crate::history::ListeningHistory;
use crate::model::PartOfDay;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

const PARETO_QUANTILE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistHours {
    pub artist: String,
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourTotal {
    pub hour: u32,
    pub hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayOfWeekBreakdown {
    pub morning: BTreeMap<u32, f64>,
    pub afternoon: BTreeMap<u32, f64>,
    pub evening: BTreeMap<u32, f64>,
    pub night: BTreeMap<u32, f64>,
}

impl DayOfWeekBreakdown {
    pub fn bucket(&self, part: PartOfDay) -> &BTreeMap<u32, f64> {
        match part {
            PartOfDay::Morning => &self.morning,
            PartOfDay::Afternoon => &self.afternoon,
            PartOfDay::Evening => &self.evening,
            PartOfDay::Night => &self.night,
        }
    }

    fn bucket_mut(&mut self, part: PartOfDay) -> &mut BTreeMap<u32, f64> {
        match part {
            PartOfDay::Morning => &mut self.morning,
            PartOfDay::Afternoon => &mut self.afternoon,
            PartOfDay::Evening => &mut self.evening,
            PartOfDay::Night => &mut self.night,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopVsRest {
    pub top_hours: f64,
    pub rest_hours: f64,
}

impl TopVsRest {
    pub fn total_hours(self) -> f64 {
        self.top_hours + self.rest_hours
    }
}

impl ListeningHistory {
    pub fn artist_totals(&self) -> Vec<ArtistHours> {
        let mut by_artist: BTreeMap<&str, f64> = BTreeMap::new();
        for event in self.kept() {
            *by_artist.entry(event.artist_name.as_str()).or_default() += event.hours_played;
        }
        by_artist
            .into_iter()
            .map(|(artist, hours)| ArtistHours {
                artist: artist.to_string(),
                hours,
            })
            .collect()
    }

    /// The `n` most played artists, least played first.
    pub fn top_n_artists(&self, n: usize) -> Result<Vec<ArtistHours>, EngineError> {
        if n == 0 {
            return Err(EngineError::invalid("n", "must be at least 1"));
        }
        let rows = ascending_by_hours(self.artist_totals());
        let skip = rows.len().saturating_sub(n);
        Ok(rows.into_iter().skip(skip).collect())
    }

    pub fn top_quantile_artists(&self, q: f64) -> Result<Vec<ArtistHours>, EngineError> {
        if !(0.0..1.0).contains(&q) {
            return Err(EngineError::invalid("q", format!("{q} is outside [0, 1)")));
        }
        let rows = ascending_by_hours(self.artist_totals());
        let sorted: Vec<f64> = rows.iter().map(|row| row.hours).collect();
        let cutoff = quantile(&sorted, q).ok_or(EngineError::EmptyDataset)?;
        Ok(rows.into_iter().filter(|row| row.hours > cutoff).collect())
    }

    pub fn hours_by_time_of_day(&self) -> Vec<HourTotal> {
        let mut by_hour: BTreeMap<u32, f64> = BTreeMap::new();
        for event in self.kept() {
            *by_hour.entry(event.hour_of_day).or_default() += event.hours_played;
        }
        by_hour
            .into_iter()
            .map(|(hour, hours)| HourTotal { hour, hours })
            .collect()
    }

    pub fn hours_by_day_of_week(&self) -> DayOfWeekBreakdown {
        let mut breakdown = DayOfWeekBreakdown::default();
        for event in self.kept() {
            *breakdown
                .bucket_mut(event.part_of_day)
                .entry(event.day_of_week)
                .or_default() += event.hours_played;
        }
        breakdown
    }

    pub fn top_vs_rest_hours<'a, I>(&self, artists: I) -> TopVsRest
    where
        I: IntoIterator<Item = &'a str>,
    {
        let artists: HashSet<&str> = artists.into_iter().collect();
        let top_hours: f64 = self
            .kept()
            .iter()
            .filter(|event| artists.contains(event.artist_name.as_str()))
            .map(|event| event.hours_played)
            .sum();
        TopVsRest {
            top_hours,
            rest_hours: self.total_hours() - top_hours,
        }
    }

    pub fn pareto_ratio(&self) -> Result<f64, EngineError> {
        let top = self.top_quantile_artists(PARETO_QUANTILE)?;
        let split = self.top_vs_rest_hours(top.iter().map(|row| row.artist.as_str()));
        ratio(split.top_hours, self.total_hours())
    }
}

pub(crate) fn ratio(part: f64, total: f64) -> Result<f64, EngineError> {
    if total <= 0.0 {
        return Err(EngineError::EmptyDataset);
    }
    Ok(part / total)
}

fn ascending_by_hours(mut rows: Vec<ArtistHours>) -> Vec<ArtistHours> {
    rows.sort_by(|a, b| a.hours.total_cmp(&b.hours));
    rows
}

fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = last as f64 * q;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}
