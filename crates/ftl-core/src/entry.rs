//! Techlog entries and their flight sectors.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::types::{EntryId, SectorId, ValidationError};

/// One takeoff-to-landing flight leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Unique identifier within the entry.
    pub id: SectorId,
    /// Departure airport code.
    pub departure: String,
    /// Arrival airport code.
    pub arrival: String,
    /// Takeoff time of day, `HH:MM`.
    pub takeoff: String,
    /// Landing time of day, `HH:MM`. Earlier than `takeoff` means next day.
    pub landing: String,
    /// Flight time in hours, derived from `takeoff` and `landing` at creation.
    #[serde(default)]
    pub flight_time: f64,
}

impl Sector {
    /// Creates a sector with a fresh ID and its flight time derived.
    pub fn new(
        departure: impl Into<String>,
        arrival: impl Into<String>,
        takeoff: impl Into<String>,
        landing: impl Into<String>,
    ) -> Self {
        let takeoff = takeoff.into();
        let landing = landing.into();
        let flight_time = clock::elapsed_hours(&takeoff, &landing);
        Self {
            id: SectorId::generate(),
            departure: departure.into(),
            arrival: arrival.into(),
            takeoff,
            landing,
            flight_time,
        }
    }

    /// True when all four airport and time fields are populated.
    pub fn is_complete(&self) -> bool {
        [&self.departure, &self.arrival, &self.takeoff, &self.landing]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Stored flight time rounded to whole minutes.
    pub fn flight_minutes(&self) -> i64 {
        clock::hours_to_minutes(self.flight_time)
    }

    /// Whether the landing falls on the calendar day after takeoff.
    pub fn lands_next_day(&self) -> bool {
        match (
            clock::parse_time_of_day(&self.takeoff),
            clock::parse_time_of_day(&self.landing),
        ) {
            (Some(takeoff), Some(landing)) => landing < takeoff,
            _ => false,
        }
    }
}

/// One techlog submission for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    pub techlog_number: String,
    pub date: NaiveDate,
    /// Aircraft registration.
    pub aircraft: String,
    pub pilot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_pilot: Option<String>,
    /// Sectors in flown order.
    pub sectors: Vec<Sector>,
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    /// True when `name` is the pilot or co-pilot.
    pub fn involves(&self, name: &str) -> bool {
        self.pilot == name || self.co_pilot.as_deref() == Some(name)
    }

    /// Sectors with all four fields populated, in flown order.
    pub fn complete_sectors(&self) -> impl Iterator<Item = &Sector> + Clone {
        self.sectors.iter().filter(|sector| sector.is_complete())
    }

    /// Checks the invariants required before an entry may be persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(&self.techlog_number, "techlog number")?;
        require_non_empty(&self.aircraft, "aircraft registration")?;
        require_non_empty(&self.pilot, "pilot name")?;
        if self.complete_sectors().next().is_none() {
            return Err(ValidationError::NoValidSectors);
        }
        Ok(())
    }
}

/// Sector fields as captured from a form row; any of them may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSector {
    pub departure: String,
    pub arrival: String,
    pub takeoff: String,
    pub landing: String,
}

/// An entry as submitted, before IDs and derived fields exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLogEntry {
    pub techlog_number: String,
    pub date: Option<NaiveDate>,
    pub aircraft: String,
    pub pilot: String,
    #[serde(default)]
    pub co_pilot: Option<String>,
    pub sectors: Vec<NewSector>,
}

impl NewLogEntry {
    /// Builds a validated [`LogEntry`].
    ///
    /// Text fields are trimmed, registrations and airport codes uppercased, a
    /// blank co-pilot becomes `None`, and rows missing any of their four
    /// fields are dropped. At least one complete row must remain.
    pub fn build(self, created_at: DateTime<Utc>) -> Result<LogEntry, ValidationError> {
        let date = self.date.ok_or(ValidationError::Empty { field: "date" })?;
        let sectors: Vec<Sector> = self
            .sectors
            .into_iter()
            .map(|row| {
                Sector::new(
                    row.departure.trim().to_ascii_uppercase(),
                    row.arrival.trim().to_ascii_uppercase(),
                    row.takeoff.trim(),
                    row.landing.trim(),
                )
            })
            .filter(Sector::is_complete)
            .collect();

        let entry = LogEntry {
            id: EntryId::generate(),
            techlog_number: self.techlog_number.trim().to_string(),
            date,
            aircraft: self.aircraft.trim().to_ascii_uppercase(),
            pilot: self.pilot.trim().to_string(),
            co_pilot: self
                .co_pilot
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            sectors,
            created_at,
        };
        entry.validate()?;
        Ok(entry)
    }
}

fn require_non_empty(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(())
    }
}
