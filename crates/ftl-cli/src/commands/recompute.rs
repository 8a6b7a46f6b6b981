//! Recompute command for rebuilding aircraft rollups from stored entries.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use ftl_db::Database;

use crate::commands::util::format_hours;

pub fn run<W: Write>(writer: &mut W, db: &mut Database, now: DateTime<Utc>) -> Result<()> {
    let all = db.recompute_all_aircraft_stats(now)?;
    writeln!(writer, "Recomputed {} aircraft", all.len())?;
    for stats in &all {
        writeln!(
            writer,
            "  {}: {} cycles, {}",
            stats.registration,
            stats.cycles,
            format_hours(stats.flight_hours)
        )?;
    }
    Ok(())
}
