use crate::error::EngineError;
use crate::history::ListeningHistory;
use crate::stats::ratio;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashSet;

pub const CHRISTMAS_TRACK: &str = "All I Want for Christmas Is You";
pub const CHRISTMAS_HOURS: f64 = 1.0;
pub const HALLOWEEN_TRACK: &str = "Thriller";
pub const HALLOWEEN_ARTIST: &str = "Michael Jackson";
pub const HALLOWEEN_DATES: &[(u32, u32)] = &[(10, 31), (11, 1)];
/// Compared as is, leap years included.
pub const DAYS_IN_YEAR: usize = 365;
pub const VARIETY_TOP_ARTISTS: usize = 20;
pub const VARIETY_MAX_SHARE: f64 = 0.3;
pub const PARETO_MIN_SHARE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackHours {
    pub achieved: bool,
    pub hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaysStreamed {
    pub achieved: bool,
    pub days: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShareOfHours {
    pub achieved: bool,
    pub ratio: f64,
}

impl ListeningHistory {
    pub fn track_hours(&self, prefix: &str, threshold_hours: f64) -> TrackHours {
        let hours: f64 = self
            .kept()
            .iter()
            .filter(|event| event.track_name.starts_with(prefix))
            .map(|event| event.hours_played)
            .sum();
        TrackHours {
            achieved: hours >= threshold_hours,
            hours,
        }
    }

    pub fn played_on_any_date(&self, track: &str, artist: &str, dates: &[(u32, u32)]) -> bool {
        self.kept().iter().any(|event| {
            event.track_name == track
                && event.artist_name == artist
                && dates.contains(&(event.date.month(), event.date.day()))
        })
    }

    pub fn all_i_want_for_christmas_is_you(&self) -> TrackHours {
        self.track_hours(CHRISTMAS_TRACK, CHRISTMAS_HOURS)
    }

    pub fn deffinitive_halloween_experience(&self) -> bool {
        self.played_on_any_date(HALLOWEEN_TRACK, HALLOWEEN_ARTIST, HALLOWEEN_DATES)
    }

    pub fn days_streamed(&self) -> DaysStreamed {
        let days = self
            .kept()
            .iter()
            .map(|event| event.date)
            .collect::<HashSet<_>>()
            .len();
        DaysStreamed {
            achieved: days == DAYS_IN_YEAR,
            days,
        }
    }

    pub fn variety_is_the_spice_of_life(&self) -> Result<ShareOfHours, EngineError> {
        let top = self.top_n_artists(VARIETY_TOP_ARTISTS)?;
        let split = self.top_vs_rest_hours(top.iter().map(|row| row.artist.as_str()));
        let ratio = ratio(split.top_hours, split.total_hours())?;
        Ok(ShareOfHours {
            achieved: ratio < VARIETY_MAX_SHARE,
            ratio,
        })
    }

    pub fn pareto_principle(&self) -> Result<ShareOfHours, EngineError> {
        let ratio = self.pareto_ratio()?;
        Ok(ShareOfHours {
            achieved: ratio > PARETO_MIN_SHARE,
            ratio,
        })
    }
}
