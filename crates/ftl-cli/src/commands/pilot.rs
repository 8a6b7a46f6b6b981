//! Pilot command: rolling-window totals and limit status for one pilot.
//!
//! Combines the window totals, the exceedance flags and the recent rest
//! verdict into a single compliance view.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;

use ftl_core::{PilotReport, RuleSet, Window};
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
    let report = PilotReport::build(&entries, name, now, rules);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    if report.duty_days.is_empty() {
        writeln!(writer, "No sectors recorded for {name}.")?;
        return Ok(());
    }
    write_report(writer, &report, rules)?;
    Ok(())
}

/// One limited metric: name, current total, limit, exceeded.
struct LimitRow {
    name: &'static str,
    total: String,
    limit: String,
    exceeded: bool,
}

fn limit_rows(report: &PilotReport, rules: &RuleSet) -> Vec<LimitRow> {
    let windows = &report.stats.windows;
    let flags = &report.stats.exceedances;
    let limits = &rules.limits;
    let hours = |name: &'static str, total: f64, limit: f64, exceeded: bool| LimitRow {
        name,
        total: format_hours(total),
        limit: format_hours(limit),
        exceeded,
    };
    vec![
        hours(
            "flight_time_7d",
            windows.days_7.flight_time(),
            limits.flight_time_7d,
            flags.flight_time_7d,
        ),
        hours(
            "flight_time_28d",
            windows.days_28.flight_time(),
            limits.flight_time_28d,
            flags.flight_time_28d,
        ),
        hours(
            "flight_time_365d",
            windows.days_365.flight_time(),
            limits.flight_time_365d,
            flags.flight_time_365d,
        ),
        hours(
            "duty_time_7d",
            windows.days_7.duty_time(),
            limits.duty_time_7d,
            flags.duty_time_7d,
        ),
        hours(
            "duty_time_28d",
            windows.days_28.duty_time(),
            limits.duty_time_28d,
            flags.duty_time_28d,
        ),
        hours(
            "duty_time_365d",
            windows.days_365.duty_time(),
            limits.duty_time_365d,
            flags.duty_time_365d,
        ),
        LimitRow {
            name: "sectors_24h",
            total: windows.hours_24.sectors.to_string(),
            limit: limits.sectors_24h.to_string(),
            exceeded: flags.sectors_24h,
        },
    ]
}

fn write_report<W: Write>(
    writer: &mut W,
    report: &PilotReport,
    rules: &RuleSet,
) -> std::io::Result<()> {
    let stats = &report.stats;
    writeln!(writer, "PILOT: {}", stats.pilot)?;
    writeln!(writer, "Evaluated at {}", stats.evaluated_at.format("%Y-%m-%d %H:%M"))?;
    writeln!(writer)?;

    writeln!(writer, "{:<6}{:>10}{:>10}{:>9}", "WINDOW", "FLIGHT", "DUTY", "SECTORS")?;
    for window in Window::ALL {
        let totals = stats.windows.get(window);
        writeln!(
            writer,
            "{:<6}{:>10}{:>10}{:>9}",
            window.label(),
            format_hours(totals.flight_time()),
            format_hours(totals.duty_time()),
            totals.sectors
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "LIMITS")?;
    for row in limit_rows(report, rules) {
        let verdict = if row.exceeded { "EXCEEDED" } else { "ok" };
        writeln!(writer, "  {:<18}{} of {}  {verdict}", row.name, row.total, row.limit)?;
    }
    writeln!(writer)?;

    let rest = &report.rest;
    let short = rest.recent.iter().filter(|period| !period.compliant).count();
    if short == 0 {
        writeln!(writer, "Rest (7d): ok, {} period(s) measured", rest.recent.len())?;
    } else {
        writeln!(writer, "Rest (7d): {short} period(s) under 36h")?;
    }
    writeln!(
        writer,
        "Overnights: {} in 7d, {} total",
        rest.overnights_recent, rest.overnights_total
    )?;
    writeln!(writer)?;

    if report.is_compliant() {
        writeln!(writer, "Status: COMPLIANT")?;
    } else {
        let mut reasons = stats.exceedances.exceeded();
        if !rest.recent_compliant() {
            reasons.push("rest");
        }
        writeln!(writer, "Status: NOT COMPLIANT ({})", reasons.join(", "))?;
    }
    Ok(())
}
