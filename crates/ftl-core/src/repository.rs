//! Storage capability the engine is handed by its caller.
//!
//! The engine never opens storage itself. Callers pass something that can
//! list the current entry snapshot and accept recomputed aircraft rollups.

use std::collections::BTreeMap;
use std::convert::Infallible;

use chrono::{DateTime, Utc};

use crate::aircraft::AircraftStats;
use crate::entry::LogEntry;

/// A source of log entries and a sink for aircraft rollups.
pub trait LogRepository {
    type Error;

    /// Every stored entry, in storage order.
    fn list(&self) -> Result<Vec<LogEntry>, Self::Error>;

    /// Inserts or replaces the rollup for `stats.registration`.
    fn upsert(&mut self, stats: &AircraftStats) -> Result<(), Self::Error>;
}

/// Recomputes one aircraft's rollup from a fresh snapshot and stores it.
pub fn refresh_aircraft_stats<R: LogRepository>(
    repo: &mut R,
    registration: &str,
    now: DateTime<Utc>,
) -> Result<AircraftStats, R::Error> {
    let entries = repo.list()?;
    let stats = AircraftStats::compute(&entries, registration, now);
    tracing::debug!(
        registration,
        cycles = stats.cycles,
        flight_hours = stats.flight_hours,
        "refreshed aircraft stats"
    );
    repo.upsert(&stats)?;
    Ok(stats)
}

/// Entries and rollups held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    entries: Vec<LogEntry>,
    aircraft: BTreeMap<String, AircraftStats>,
}

impl InMemoryRepository {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self {
            entries,
            aircraft: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn aircraft_stats(&self, registration: &str) -> Option<&AircraftStats> {
        self.aircraft.get(registration)
    }
}

impl LogRepository for InMemoryRepository {
    type Error = Infallible;

    fn list(&self) -> Result<Vec<LogEntry>, Self::Error> {
        Ok(self.entries.clone())
    }

    fn upsert(&mut self, stats: &AircraftStats) -> Result<(), Self::Error> {
        self.aircraft
            .insert(stats.registration.clone(), stats.clone());
        Ok(())
    }
}
