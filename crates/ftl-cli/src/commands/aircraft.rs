//! Aircraft command: the stored cycle and hour rollup for one airframe.

use std::io::Write;

use anyhow::Result;

use ftl_db::Database;

use crate::commands::util::format_hours;

pub fn run<W: Write>(writer: &mut W, db: &Database, registration: &str, json: bool) -> Result<()> {
    let registration = registration.trim().to_ascii_uppercase();
    let stats = db.get_aircraft_stats(&registration)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&stats)?)?;
        return Ok(());
    }

    let Some(stats) = stats else {
        writeln!(writer, "No entries recorded for {registration}.")?;
        return Ok(());
    };
    writeln!(writer, "AIRCRAFT: {}", stats.registration)?;
    writeln!(writer, "Cycles:       {}", stats.cycles)?;
    writeln!(
        writer,
        "Flight hours: {} ({:.2})",
        format_hours(stats.flight_hours),
        stats.flight_hours
    )?;
    let entries = db.list_entries_for_aircraft(&registration)?;
    if let Some(last) = entries.last() {
        writeln!(writer, "Entries:      {}, last flown {}", entries.len(), last.date)?;
    }
    writeln!(writer, "Updated:      {}", stats.last_updated.format("%Y-%m-%d %H:%M UTC"))?;
    Ok(())
}
