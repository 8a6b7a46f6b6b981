//! Time-of-day arithmetic.
//!
//! Techlog times are local wall-clock `HH:MM` strings without a date. A
//! landing that is numerically earlier than its takeoff is taken to happen on
//! the following calendar day.
//!
//! Malformed input never fails here: durations degrade to zero and a warning
//! is logged, so an in-progress form keeps computing.

use chrono::{NaiveTime, Timelike};

use crate::types::ValidationError;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parses an `H:MM` or `HH:MM` 24-hour time of day.
///
/// Surrounding whitespace is ignored. Returns `None` for anything else.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Strict variant of [`parse_time_of_day`] for input boundaries.
pub fn require_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    parse_time_of_day(value).ok_or_else(|| ValidationError::InvalidTimeOfDay {
        value: value.to_string(),
    })
}

/// Minutes elapsed since midnight.
pub fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

/// Elapsed minutes from `takeoff` to `landing`, wrapping past midnight.
///
/// Returns `None` when either side fails to parse.
pub fn elapsed_minutes(takeoff: &str, landing: &str) -> Option<i64> {
    let start = minute_of_day(parse_time_of_day(takeoff)?);
    let end = minute_of_day(parse_time_of_day(landing)?);
    if end < start {
        Some(end + MINUTES_PER_DAY - start)
    } else {
        Some(end - start)
    }
}

/// Elapsed hours from `takeoff` to `landing`, wrapping past midnight.
///
/// Malformed input yields `0.0`.
pub fn elapsed_hours(takeoff: &str, landing: &str) -> f64 {
    elapsed_minutes(takeoff, landing).map_or_else(
        || {
            tracing::warn!(takeoff, landing, "unparseable time of day, using zero duration");
            0.0
        },
        minutes_to_hours,
    )
}

/// Converts whole minutes to fractional hours.
#[allow(clippy::cast_precision_loss)]
pub fn minutes_to_hours(minutes: i64) -> f64 {
    minutes as f64 / 60.0
}

/// Converts fractional hours to the nearest whole minute.
#[allow(clippy::cast_possible_truncation)]
pub fn hours_to_minutes(hours: f64) -> i64 {
    if hours.is_finite() {
        (hours * 60.0).round() as i64
    } else {
        0
    }
}

/// Serde adapter that stores whole minutes as fractional hours.
pub mod as_hours {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(minutes: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(super::minutes_to_hours(*minutes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        f64::deserialize(deserializer).map(super::hours_to_minutes)
    }
}
