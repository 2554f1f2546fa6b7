//! Dates arrive either as RFC 3339 timestamps or as plain `YYYY-MM-DD` from date pickers;
//! the latter are read as midnight UTC.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::de::{self, Deserialize, Deserializer};
use validator::{ValidationError, ValidationErrors};

pub fn parse(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
        return Ok(date_time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("invalid date `{}`, expected RFC 3339 or YYYY-MM-DD", s))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(de::Error::custom)
}

/// `null` or absent -> `None`
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(ref s) if !s.is_empty() => parse(s).map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

/// Absent -> `None`, `null` or "" -> `Some(None)`. Needs `#[serde(default)]`.
pub fn deserialize_double_option<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_option(deserializer).map(Some)
}

/// A period may be open ended, but never end before it starts
pub fn check_period(start_at: Option<DateTime<Utc>>, end_at: Option<DateTime<Utc>>) -> Result<(), ValidationErrors> {
    match (start_at, end_at) {
        (Some(start_at), Some(end_at)) if end_at < start_at => {
            let mut errors = ValidationErrors::new();
            errors.add("endAt", ValidationError::new("ends_before_start"));
            Err(errors)
        }
        _ => Ok(()),
    }
}
