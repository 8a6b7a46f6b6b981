//! Aircraft cycle and hour rollups.
//!
//! [`AircraftStats::compute`] derives the rollup from the full entry set and is
//! always correct for that set. [`AircraftStats::apply_entry`] adds one entry
//! to an existing rollup; it is only valid while the history is append-only.
//! Once an entry is edited or deleted, an incrementally maintained rollup is
//! stale until it is recomputed.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::entry::LogEntry;

/// Lifetime totals for one airframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftStats {
    pub registration: String,
    /// Total complete sectors flown.
    pub cycles: u64,
    /// Total flight hours.
    pub flight_hours: f64,
    pub last_updated: DateTime<Utc>,
}

impl AircraftStats {
    /// An airframe with nothing logged yet.
    pub fn empty(registration: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            registration: registration.into(),
            cycles: 0,
            flight_hours: 0.0,
            last_updated: now,
        }
    }

    /// Recomputes the rollup for `registration` from every entry.
    pub fn compute(entries: &[LogEntry], registration: &str, now: DateTime<Utc>) -> Self {
        entries
            .iter()
            .filter(|entry| entry.aircraft == registration)
            .fold(Self::empty(registration, now), |stats, entry| {
                stats.apply_entry(entry, now)
            })
    }

    /// Adds one entry's complete sectors to the rollup.
    ///
    /// Entries for other registrations are ignored.
    #[must_use]
    pub fn apply_entry(mut self, entry: &LogEntry, now: DateTime<Utc>) -> Self {
        if entry.aircraft != self.registration {
            return self;
        }
        let sectors = entry.complete_sectors();
        self.flight_hours += aggregate::flight_time(sectors.clone());
        self.cycles += sectors.count() as u64;
        self.last_updated = now;
        self
    }
}

/// Distinct aircraft registrations, sorted.
pub fn fleet_registrations(entries: &[LogEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.aircraft.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
