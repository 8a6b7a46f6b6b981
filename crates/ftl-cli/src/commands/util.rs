//! Shared utilities for CLI commands.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use ftl_core::NewSector;
use ftl_core::clock::require_time_of_day;

const AT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses an `--at` instant as local wall-clock time.
///
/// Supports:
/// - Date and time: "2024-03-26T09:00", "2024-03-26 09:00:30"
/// - Date only: "2024-03-26" (taken at 00:00)
pub fn parse_at(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    if let Some(at) = AT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
    {
        return Ok(at);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| format!("invalid time: {s} (use YYYY-MM-DD or YYYY-MM-DDTHH:MM)"))
}

/// Parses a `--sector` value of the form `DEP,ARR,TAKEOFF,LANDING`.
///
/// Times are checked here so a typo fails loudly instead of being dropped
/// as an incomplete row.
pub fn parse_sector(s: &str) -> Result<NewSector, String> {
    let fields: Vec<&str> = s.split(',').map(str::trim).collect();
    let [departure, arrival, takeoff, landing] = fields.as_slice() else {
        return Err(format!(
            "invalid sector: {s} (expected DEP,ARR,TAKEOFF,LANDING)"
        ));
    };
    for value in [takeoff, landing] {
        require_time_of_day(value).map_err(|e| e.to_string())?;
    }
    if departure.is_empty() || arrival.is_empty() {
        return Err(format!("invalid sector: {s} (airport codes cannot be empty)"));
    }
    Ok(NewSector {
        departure: (*departure).to_string(),
        arrival: (*arrival).to_string(),
        takeoff: (*takeoff).to_string(),
        landing: (*landing).to_string(),
    })
}

/// The evaluation instant: `--at` if given, otherwise local now.
pub fn evaluation_instant(at: Option<NaiveDateTime>) -> NaiveDateTime {
    at.unwrap_or_else(|| Local::now().naive_local())
}

/// Formats fractional hours as e.g. "5h 45m".
#[allow(clippy::cast_possible_truncation)]
pub fn format_hours(hours: f64) -> String {
    if hours <= 0.0 || !hours.is_finite() {
        return "0h 00m".to_string();
    }
    let total_minutes = (hours * 60.0).round() as i64;
    format!("{}h {:02}m", total_minutes / 60, total_minutes % 60)
}

/// Formats a duty boundary relative to the day it belongs to.
///
/// A boundary that falls on a later date gets a "+N" day suffix.
pub fn format_boundary(at: Option<NaiveDateTime>, day: NaiveDate) -> String {
    let Some(at) = at else {
        return "--:--".to_string();
    };
    let time = at.format("%H:%M");
    let offset = (at.date() - day).num_days();
    if offset > 0 {
        format!("{time}+{offset}")
    } else {
        time.to_string()
    }
}
