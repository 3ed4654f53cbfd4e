use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::model::{PartOfDay, PlayEvent, RawPlayEvent, RawTimestamp, SkippedPlay};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;

const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%d %H:%M:%S%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y%m%dT%H%M%S%#z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%MZ",
    "%Y%m%dT%H%M%SZ",
    "%Y%m%dT%H%M%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

#[derive(Debug, Clone)]
pub struct ListeningHistory {
    config: EngineConfig,
    tz: Tz,
    kept: Vec<PlayEvent>,
    skipped: Vec<SkippedPlay>,
    total_hours: f64,
}

impl ListeningHistory {
    /// The first malformed record rejects the whole dataset.
    pub fn from_batches<I>(batches: I, config: EngineConfig) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = Vec<RawPlayEvent>>,
    {
        let tz = config.tz()?;
        let mut kept = Vec::new();
        let mut skipped = Vec::new();
        let mut outside_year = 0_usize;

        for (batch, records) in batches.into_iter().enumerate() {
            log::debug!("ingesting batch {batch} with {} records", records.len());
            for (index, raw) in records.into_iter().enumerate() {
                let end_time = parse_end_time(&raw.end_time)
                    .map_err(|reason| EngineError::MalformedRecord {
                        batch,
                        index,
                        field: "endTime",
                        reason,
                    })?
                    .with_timezone(&tz);

                if end_time.year() != config.filter_year {
                    outside_year += 1;
                    continue;
                }

                if raw.ms_played <= config.min_ms_played {
                    skipped.push(SkippedPlay {
                        track_name: raw.track_name,
                        artist_name: raw.artist_name,
                        end_time,
                        ms_played: raw.ms_played,
                    });
                } else {
                    kept.push(decorate(raw, end_time));
                }
            }
        }

        let total_hours = kept.iter().map(|event| event.hours_played).sum();
        log::info!(
            "ingested {} plays for {} ({}): {} skipped, {} outside the year",
            kept.len(),
            config.filter_year,
            tz.name(),
            skipped.len(),
            outside_year
        );

        Ok(Self {
            config,
            tz,
            kept,
            skipped,
            total_hours,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn kept(&self) -> &[PlayEvent] {
        &self.kept
    }

    pub fn skipped(&self) -> &[SkippedPlay] {
        &self.skipped
    }

    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

fn decorate(raw: RawPlayEvent, end_time: DateTime<Tz>) -> PlayEvent {
    let hour_of_day = end_time.hour();
    PlayEvent {
        date: end_time.date_naive(),
        month: end_time.month(),
        iso_week: end_time.iso_week().week(),
        day_of_week: end_time.weekday().num_days_from_monday(),
        hour_of_day,
        part_of_day: PartOfDay::from_hour(hour_of_day),
        hours_played: raw.ms_played as f64 / MS_PER_HOUR,
        track_name: raw.track_name,
        artist_name: raw.artist_name,
        end_time,
        ms_played: raw.ms_played,
    }
}

/// Naive text is UTC; an explicit offset wins.
fn parse_end_time(raw: &RawTimestamp) -> Result<DateTime<Utc>, String> {
    match raw {
        RawTimestamp::Epoch(seconds) => DateTime::<Utc>::from_timestamp(*seconds, 0)
            .ok_or_else(|| format!("epoch {seconds} is out of range")),
        RawTimestamp::Text(text) => {
            let text = text.trim();
            let with_offset = DateTime::parse_from_rfc3339(text).ok().or_else(|| {
                OFFSET_FORMATS
                    .iter()
                    .find_map(|format| DateTime::parse_from_str(text, format).ok())
            });
            if let Some(parsed) = with_offset {
                return Ok(parsed.with_timezone(&Utc));
            }
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .or_else(|| {
                    DATE_FORMATS
                        .iter()
                        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .map(|naive| naive.and_utc())
                .ok_or_else(|| format!("cannot parse timestamp {text:?}"))
        }
    }
}
