//! Import command for loading exported entries.
//!
//! Reads a JSON array of entries (as written by `ftl export`) from a file or
//! stdin. Entries whose ID is already stored are skipped.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use ftl_core::LogEntry;
use ftl_core::clock::elapsed_hours;
use ftl_db::Database;

/// Parses entries and fills in sector flight times missing from the payload.
///
/// Registrations and airport codes are uppercased and times trimmed, matching
/// entries recorded with `ftl add`.
pub fn parse_entries(json: &str) -> Result<Vec<LogEntry>> {
    let mut entries: Vec<LogEntry> = serde_json::from_str(json).context("invalid entry JSON")?;
    for entry in &mut entries {
        entry.aircraft = entry.aircraft.trim().to_ascii_uppercase();
        for sector in &mut entry.sectors {
            sector.departure = sector.departure.trim().to_ascii_uppercase();
            sector.arrival = sector.arrival.trim().to_ascii_uppercase();
            sector.takeoff = sector.takeoff.trim().to_string();
            sector.landing = sector.landing.trim().to_string();
            if sector.flight_time <= 0.0 {
                sector.flight_time = elapsed_hours(&sector.takeoff, &sector.landing);
            }
        }
    }
    Ok(entries)
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    path: &Path,
    now: DateTime<Utc>,
) -> Result<usize> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    let entries = parse_entries(&json)?;
    let inserted = db.import_entries(&entries, now)?;
    writeln!(
        writer,
        "Imported {inserted} of {} entries ({} already present)",
        entries.len(),
        entries.len() - inserted
    )?;
    Ok(inserted)
}
