use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayEvent {
    pub track_name: String,
    pub artist_name: String,
    pub end_time: RawTimestamp,
    pub ms_played: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Epoch(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl RawPlayEvent {
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        end_time: impl Into<String>,
        ms_played: u64,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            end_time: RawTimestamp::Text(end_time.into()),
            ms_played,
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, FieldError> {
        let Some(object) = value.as_object() else {
            return Err(FieldError::new("record", "is not an object"));
        };

        let text_field = |field: &'static str| -> Result<String, FieldError> {
            match object.get(field) {
                Some(Value::String(text)) => Ok(text.clone()),
                Some(Value::Null) | None => Err(FieldError::new(field, "is missing")),
                Some(other) => Err(FieldError::new(
                    field,
                    format!("must be a string, got {other}"),
                )),
            }
        };

        let track_name = text_field("trackName")?;
        let artist_name = text_field("artistName")?;

        let end_time = match object.get("endTime") {
            Some(Value::String(text)) => RawTimestamp::Text(text.clone()),
            Some(Value::Number(number)) => number
                .as_i64()
                .map(RawTimestamp::Epoch)
                .ok_or_else(|| FieldError::new("endTime", "must be whole epoch seconds"))?,
            Some(Value::Null) | None => return Err(FieldError::new("endTime", "is missing")),
            Some(other) => {
                return Err(FieldError::new(
                    "endTime",
                    format!("must be a timestamp, got {other}"),
                ));
            }
        };

        let ms_played = match object.get("msPlayed") {
            Some(Value::Number(number)) => number.as_u64().ok_or_else(|| {
                FieldError::new("msPlayed", format!("must be a non-negative integer, got {number}"))
            })?,
            Some(Value::Null) | None => return Err(FieldError::new("msPlayed", "is missing")),
            Some(other) => {
                return Err(FieldError::new(
                    "msPlayed",
                    format!("must be an integer, got {other}"),
                ));
            }
        };

        Ok(Self {
            track_name,
            artist_name,
            end_time,
            ms_played,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfDay {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl PartOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=12 => Self::Morning,
            13..=17 => Self::Afternoon,
            18..=21 => Self::Evening,
            _ => Self::Night,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayEvent {
    pub track_name: String,
    pub artist_name: String,
    pub end_time: DateTime<Tz>,
    pub ms_played: u64,
    pub date: NaiveDate,
    pub month: u32,
    pub iso_week: u32,
    pub day_of_week: u32,
    pub hour_of_day: u32,
    pub part_of_day: PartOfDay,
    pub hours_played: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPlay {
    pub track_name: String,
    pub artist_name: String,
    pub end_time: DateTime<Tz>,
    pub ms_played: u64,
}
