//! Rest command: rest periods between a pilot's duty days.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;

use ftl_core::rules::MINIMUM_REST_HOURS;
use ftl_core::{RestEvaluation, RuleSet, daily_duty_summaries};
use ftl_db::Database;

use crate::commands::util::format_hours;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    name: &str,
    now: NaiveDateTime,
    rules: &RuleSet,
    json: bool,
) -> Result<()> {
    let entries = db.list_entries()?;
    let days = daily_duty_summaries(&entries, name, rules);
    let rest = RestEvaluation::evaluate(&days, now, &rules.buffers);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&rest)?)?;
        return Ok(());
    }

    writeln!(writer, "REST: {name}")?;
    writeln!(writer, "Evaluated at {}", now.format("%Y-%m-%d %H:%M"))?;
    writeln!(writer)?;

    if rest.history.is_empty() {
        writeln!(writer, "No rest periods measured (fewer than two duty days).")?;
    }
    for period in &rest.history {
        let verdict = if period.compliant { "ok" } else { "SHORT" };
        writeln!(
            writer,
            "{} {} -> {} {}  {:>8}  {verdict}",
            period.after,
            period.start.format("%H:%M"),
            period.before,
            period.end.format("%H:%M"),
            format_hours(period.hours)
        )?;
    }
    writeln!(writer)?;

    let short = rest.recent.iter().filter(|period| !period.compliant).count();
    if short == 0 {
        writeln!(
            writer,
            "Last 7 days: ok ({} period(s), minimum {MINIMUM_REST_HOURS}h)",
            rest.recent.len()
        )?;
    } else {
        writeln!(writer, "Last 7 days: {short} period(s) under {MINIMUM_REST_HOURS}h")?;
    }
    writeln!(
        writer,
        "Overnights: {} in 7d, {} total",
        rest.overnights_recent, rest.overnights_total
    )?;
    Ok(())
}
