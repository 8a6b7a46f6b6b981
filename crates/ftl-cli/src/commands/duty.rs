//! Duty command: a pilot's flying days, newest first.

use std::io::Write;

use anyhow::Result;

use ftl_core::{DailyDutySummary, RuleSet, daily_duty_summaries};
use ftl_db::Database;

use crate::commands::util::{format_boundary, format_hours};

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    name: &str,
    rules: &RuleSet,
    json: bool,
) -> Result<()> {
    let entries = db.list_entries()?;
    let days = daily_duty_summaries(&entries, name, rules);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&days)?)?;
        return Ok(());
    }

    if days.is_empty() {
        writeln!(writer, "No sectors recorded for {name}.")?;
        return Ok(());
    }

    writeln!(writer, "DUTY DAYS: {name}")?;
    writeln!(writer)?;
    for day in &days {
        write_day(writer, day)?;
    }
    let overnights = days.iter().filter(|day| day.overnight).count();
    writeln!(writer)?;
    writeln!(
        writer,
        "{} day(s), {overnights} ending away from {}",
        days.len(),
        rules.home_base
    )?;
    Ok(())
}

/// Route as departure of the first sector then each arrival, e.g. `HTDA-HTKJ-HTDA`.
fn route(day: &DailyDutySummary) -> String {
    let mut stops: Vec<&str> = day
        .sectors
        .first()
        .map(|sector| sector.departure.as_str())
        .into_iter()
        .collect();
    stops.extend(day.sectors.iter().map(|sector| sector.arrival.as_str()));
    stops.join("-")
}

fn write_day<W: Write>(writer: &mut W, day: &DailyDutySummary) -> std::io::Result<()> {
    write!(
        writer,
        "{}  {}-{}  flight {}  duty {}  {} sector(s)  {}",
        day.date,
        format_boundary(day.first_takeoff, day.date),
        format_boundary(day.last_landing, day.date),
        format_hours(day.flight_time),
        format_hours(day.duty_time),
        day.sector_count,
        route(day)
    )?;
    if day.overnight {
        write!(writer, "  overnight")?;
    }
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeZone, Utc};
    use ftl_core::{EntryId, LogEntry, Sector};
    use insta::assert_snapshot;

    fn entry(day: NaiveDate, sectors: Vec<Sector>) -> LogEntry {
        LogEntry {
            id: EntryId::generate(),
            techlog_number: "TL-9".to_string(),
            date: day,
            aircraft: "5H-TCA".to_string(),
            pilot: "A. Smith".to_string(),
            co_pilot: None,
            sectors,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn duty_command_lists_days_newest_first() {
        let mut db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        db.insert_entry(
            &entry(day(1), vec![
                Sector::new("HTDA", "HTKJ", "06:30", "07:25"),
                Sector::new("HTKJ", "HTDA", "08:10", "09:00"),
            ]),
            now,
        )
        .unwrap();
        let late = entry(day(2), vec![Sector::new("HTDA", "HKJK", "22:30", "00:10")]);
        db.insert_entry(&late, now).unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, "A. Smith", &RuleSet::default(), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        DUTY DAYS: A. Smith

        2024-03-02  22:30-00:10+1  flight 1h 40m  duty 1h 10m  1 sector(s)  HTDA-HKJK  overnight
        2024-03-01  06:30-09:00  flight 1h 45m  duty 2h 00m  2 sector(s)  HTDA-HTKJ-HTDA

        2 day(s), 1 ending away from HTDA
        ");
    }

    #[test]
    fn duty_command_json_is_array() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, "Nobody", &RuleSet::default(), true).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "[]\n");
    }
}
