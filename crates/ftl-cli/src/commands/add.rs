//! Add command for recording a techlog entry.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};

use ftl_core::{LogEntry, NewLogEntry};
use ftl_db::Database;

use crate::cli::AddArgs;
use crate::commands::util::format_hours;

/// Builds the entry from the arguments, stores it, and prints a summary.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: AddArgs,
    now: DateTime<Utc>,
) -> Result<LogEntry> {
    let submission = NewLogEntry {
        techlog_number: args.techlog,
        date: Some(args.date.unwrap_or_else(|| Local::now().date_naive())),
        aircraft: args.aircraft,
        pilot: args.pilot,
        co_pilot: args.co_pilot,
        sectors: args.sectors,
    };
    let entry = submission.build(now).context("invalid entry")?;

    if !db.insert_entry(&entry, now)? {
        anyhow::bail!("entry {} already exists", entry.id);
    }
    tracing::debug!(id = %entry.id, aircraft = %entry.aircraft, "entry recorded");

    let flight_time: f64 = entry.complete_sectors().map(|s| s.flight_time).sum();
    writeln!(writer, "Recorded entry {}", entry.id)?;
    writeln!(
        writer,
        "  {} {} {}: {} sector(s), {} flight time",
        entry.date,
        entry.aircraft,
        entry.techlog_number,
        entry.sectors.len(),
        format_hours(flight_time)
    )?;
    if let Some(stats) = db.get_aircraft_stats(&entry.aircraft)? {
        writeln!(
            writer,
            "  {} now at {} cycles, {}",
            stats.registration,
            stats.cycles,
            format_hours(stats.flight_hours)
        )?;
    }

    Ok(entry)
}
