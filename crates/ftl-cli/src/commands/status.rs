//! Status command for showing what the database holds.

use std::io::Write;

use anyhow::Result;

use ftl_db::Database;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, db: &Database, config: &Config) -> Result<()> {
    writeln!(writer, "Flight time tracker status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(
        writer,
        "Home base: {}  (report +{}m, release +{}m)",
        config.home_base, config.report_offset_minutes, config.release_offset_minutes
    )?;

    let count = db.entry_count()?;
    if count == 0 {
        writeln!(writer, "No entries recorded.")?;
        return Ok(());
    }

    let latest = db.latest_entry_date()?.unwrap_or_default();
    writeln!(writer, "Entries: {count} (latest {latest})")?;
    let aircraft = db.list_aircraft_stats()?;
    writeln!(writer, "Aircraft: {}", aircraft.len())?;
    for stats in aircraft {
        writeln!(writer, "- {}: {} cycles", stats.registration, stats.cycles)?;
    }

    Ok(())
}
