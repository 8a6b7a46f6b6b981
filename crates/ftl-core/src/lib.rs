//! Flight and duty time compliance engine.
//!
//! Pure functions over a snapshot of techlog entries and an explicit
//! evaluation instant:
//! - Time arithmetic: `HH:MM` parsing and overnight-aware durations
//! - Aggregation: flight time, duty time and sector counts
//! - Windows: 24h/7d/28d/365d trailing totals per pilot
//! - Exceedance: comparison against the regulatory limits
//! - Duty days: per-date grouping with overnight detection
//! - Rest: inter-duty rest periods and 36h compliance
//!
//! Nothing here reads the clock or touches storage. Storage is reached only
//! through a caller-supplied [`LogRepository`].

pub mod aggregate;
mod aircraft;
pub mod clock;
mod duty;
mod entry;
mod exceedance;
mod pilot;
mod repository;
mod rest;
pub mod rules;
mod types;
mod window;

pub use aircraft::{AircraftStats, fleet_registrations};
pub use duty::{DailyDutySummary, daily_duty_summaries};
pub use entry::{LogEntry, NewLogEntry, NewSector, Sector};
pub use exceedance::{Exceedances, exceeds};
pub use pilot::{PilotReport, PilotStats, fleet_overview, pilot_roster};
pub use repository::{InMemoryRepository, LogRepository, refresh_aircraft_stats};
pub use rest::{RestEvaluation, RestPeriod, is_sufficient_rest, rest_periods};
pub use rules::{DutyBuffers, Limits, REGULATORY_LIMITS, RuleSet};
pub use types::{EntryId, SectorId, ValidationError};
pub use window::{PilotWindows, Window, WindowTotals, entries_for_pilot, window_totals};
