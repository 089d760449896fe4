//! Typed parsing of GTFS text fields.
//!
//! Failures are returned as messages; the processor attaches table and line.

use chrono::NaiveDate;

use crate::{Distance, Time};

/// Parse a GTFS time (`HH:MM:SS`, hours may exceed 23) to seconds since midnight.
///
/// A single-digit hour (`H:MM:SS`) is accepted as many feeds write it that way.
pub fn parse_time(time_str: &str) -> Result<Time, String> {
    let invalid = || format!("invalid time '{time_str}', expected HH:MM:SS");

    let mut parts = time_str.split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let field = |part: &str, lengths: std::ops::RangeInclusive<usize>| -> Result<u32, String> {
        if !lengths.contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse::<u32>().map_err(|_| invalid())
    };

    let hours = field(hours, 1..=3)?;
    let minutes = field(minutes, 2..=2)?;
    let seconds = field(seconds, 2..=2)?;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Parse an optional time field; an empty field means "not given"
pub fn parse_optional_time(time_str: &str) -> Result<Option<Time>, String> {
    if time_str.is_empty() {
        Ok(None)
    } else {
        parse_time(time_str).map(Some)
    }
}

/// Parse a `YYYYMMDD` service date
pub fn parse_date(date_str: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_str, "%Y%m%d")
        .map_err(|e| format!("invalid date '{date_str}': {e}"))
}

/// Parse a `"0"`/`"1"` weekday flag
pub fn parse_flag(name: &str, value: &str) -> Result<bool, String> {
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(format!("invalid {name} flag '{other}', expected 0 or 1")),
    }
}

pub fn parse_coordinate(name: &str, value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid {name} '{value}'"))
}

pub fn parse_sequence(name: &str, value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|e| format!("invalid {name} '{value}': {e}"))
}

/// Parse `shape_dist_traveled`; an empty field means unknown and reads as 0
pub fn parse_distance(value: &str) -> Result<Distance, String> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| format!("invalid shape_dist_traveled '{value}'"))
}
