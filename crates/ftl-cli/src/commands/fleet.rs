//! Fleet command: limit status for every pilot on record.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;

use ftl_core::{PilotStats, RuleSet, fleet_overview};
use ftl_db::Database;

use crate::commands::util::format_hours;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    now: NaiveDateTime,
    rules: &RuleSet,
    json: bool,
) -> Result<()> {
    let entries = db.list_entries()?;
    let overview = fleet_overview(&entries, now, rules);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&overview)?)?;
        return Ok(());
    }

    if overview.is_empty() {
        writeln!(writer, "No pilots on record.")?;
        return Ok(());
    }
    write_overview(writer, &overview, now)?;
    Ok(())
}

fn write_overview<W: Write>(
    writer: &mut W,
    overview: &[PilotStats],
    now: NaiveDateTime,
) -> std::io::Result<()> {
    writeln!(writer, "FLEET STATUS at {}", now.format("%Y-%m-%d %H:%M"))?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:<16}{:>10}{:>10}{:>9}  STATUS",
        "PILOT", "FLT 7D", "DUTY 7D", "SEC 24H"
    )?;
    for stats in overview {
        let exceeded = stats.exceedances.exceeded();
        let status = if exceeded.is_empty() {
            "ok".to_string()
        } else {
            format!("EXCEEDED: {}", exceeded.join(", "))
        };
        writeln!(
            writer,
            "{:<16}{:>10}{:>10}{:>9}  {status}",
            stats.pilot,
            format_hours(stats.windows.days_7.flight_time()),
            format_hours(stats.windows.days_7.duty_time()),
            stats.windows.hours_24.sectors
        )?;
    }
    let exceeding = overview.iter().filter(|stats| stats.has_exceedance()).count();
    writeln!(writer)?;
    writeln!(writer, "{} pilot(s), {exceeding} over a limit", overview.len())?;
    Ok(())
}
