//! Per-sector-set sums: flight time, duty span and duty time.

use std::collections::BTreeMap;

use crate::clock::{self, MINUTES_PER_DAY};
use crate::entry::{LogEntry, Sector};
use crate::rules::DutyBuffers;

/// Earliest takeoff to latest landing, in minutes from midnight of the duty date.
///
/// `end` exceeds [`MINUTES_PER_DAY`] when a sector lands after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutySpan {
    pub start: i64,
    pub end: i64,
}

impl DutySpan {
    /// Duty minutes after applying the buffers, floored at zero.
    pub fn duty_minutes(&self, buffers: &DutyBuffers) -> i64 {
        let start = self.start + buffers.report_offset_minutes;
        let end = self.end + buffers.release_offset_minutes;
        (end - start).max(0)
    }
}

/// Sum of each sector's flight time, in whole minutes.
pub fn flight_minutes<'a>(sectors: impl IntoIterator<Item = &'a Sector>) -> i64 {
    sectors.into_iter().map(Sector::flight_minutes).sum()
}

/// Sum of each sector's flight time, in hours.
pub fn flight_time<'a>(sectors: impl IntoIterator<Item = &'a Sector>) -> f64 {
    clock::minutes_to_hours(flight_minutes(sectors))
}

/// Span from the earliest takeoff to the latest landing.
///
/// Sectors whose times do not parse are left out. Returns `None` when no
/// sector has usable times.
pub fn duty_span<'a>(sectors: impl IntoIterator<Item = &'a Sector>) -> Option<DutySpan> {
    let mut span: Option<DutySpan> = None;
    for sector in sectors {
        let (Some(takeoff), Some(landing)) = (
            clock::parse_time_of_day(&sector.takeoff),
            clock::parse_time_of_day(&sector.landing),
        ) else {
            tracing::warn!(
                sector = %sector.id,
                "sector times unparseable, excluded from duty span"
            );
            continue;
        };
        let start = clock::minute_of_day(takeoff);
        let mut end = clock::minute_of_day(landing);
        if sector.lands_next_day() {
            end += MINUTES_PER_DAY;
        }
        span = Some(match span {
            Some(current) => DutySpan {
                start: current.start.min(start),
                end: current.end.max(end),
            },
            None => DutySpan { start, end },
        });
    }
    span
}

/// Duty minutes for a set of sectors; zero when there are none.
pub fn duty_minutes<'a>(
    sectors: impl IntoIterator<Item = &'a Sector>,
    buffers: &DutyBuffers,
) -> i64 {
    duty_span(sectors).map_or(0, |span| span.duty_minutes(buffers))
}

/// Duty hours for a set of sectors; zero when there are none.
pub fn duty_time<'a>(sectors: impl IntoIterator<Item = &'a Sector>, buffers: &DutyBuffers) -> f64 {
    clock::minutes_to_hours(duty_minutes(sectors, buffers))
}

/// Flight minutes, duty minutes and sector count for one entry's complete sectors.
///
/// Totals stay in whole minutes so sums over many entries are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryTotals {
    pub flight_minutes: i64,
    pub duty_minutes: i64,
    pub sectors: usize,
}

impl EntryTotals {
    pub fn of(entry: &LogEntry, buffers: &DutyBuffers) -> Self {
        let sectors = entry.complete_sectors();
        Self {
            flight_minutes: flight_minutes(sectors.clone()),
            duty_minutes: duty_minutes(sectors.clone(), buffers),
            sectors: sectors.count(),
        }
    }
}

impl std::ops::AddAssign for EntryTotals {
    fn add_assign(&mut self, other: Self) {
        self.flight_minutes += other.flight_minutes;
        self.duty_minutes += other.duty_minutes;
        self.sectors += other.sectors;
    }
}

/// Totals keyed by an arbitrary grouping (pilot, aircraft, date, ...).
pub fn totals_by<K, F>(
    entries: &[LogEntry],
    buffers: &DutyBuffers,
    key: F,
) -> BTreeMap<K, EntryTotals>
where
    K: Ord,
    F: Fn(&LogEntry) -> K,
{
    let mut grouped: BTreeMap<K, EntryTotals> = BTreeMap::new();
    for entry in entries {
        *grouped.entry(key(entry)).or_default() += EntryTotals::of(entry, buffers);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::types::EntryId;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn entry(aircraft: &str, date: (i32, u32, u32), sectors: Vec<Sector>) -> LogEntry {
        LogEntry {
            id: EntryId::generate(),
            techlog_number: "TL-1".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            aircraft: aircraft.to_string(),
            pilot: "A. Smith".to_string(),
            co_pilot: None,
            sectors,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn flight_time_sums_sectors() {
        let sectors = [
            Sector::new("KJFK", "KLAX", "07:00", "10:30"),
            Sector::new("KLAX", "KSEA", "11:30", "13:45"),
        ];
        assert!(approx(flight_time(&sectors), 5.75));
    }

    #[test]
    fn duty_time_uses_buffers() {
        let sectors = [
            Sector::new("KJFK", "KLAX", "07:00", "10:30"),
            Sector::new("KLAX", "KSEA", "11:30", "13:45"),
        ];
        // (13:45 + 15m) - (07:00 + 45m) = 14:00 - 07:45
        assert!(approx(duty_time(&sectors, &DutyBuffers::default()), 6.25));
    }

    #[test]
    fn duty_span_crosses_midnight() {
        let sectors = [
            Sector::new("HTDA", "HKJK", "21:00", "22:10"),
            Sector::new("HKJK", "OMDB", "23:30", "04:00"),
        ];
        let span = duty_span(&sectors).unwrap();
        assert_eq!(span.start, 21 * 60);
        assert_eq!(span.end, 28 * 60);
    }

    #[test]
    fn duty_time_never_negative() {
        let short = [Sector::new("HTDA", "HTKJ", "10:00", "10:10")];
        assert!(approx(duty_time(&short, &DutyBuffers::default()), 0.0));

        let odd = DutyBuffers {
            report_offset_minutes: 600,
            release_offset_minutes: -600,
        };
        let sectors = [Sector::new("HTDA", "HKJK", "07:00", "09:00")];
        assert!(duty_time(&sectors, &odd) >= 0.0);
    }

    #[test]
    fn tenth_hour_sectors_sum_exactly() {
        let sectors: Vec<Sector> = (0..10)
            .map(|i| {
                let (hour, minute) = (6 + i / 6, (i % 6) * 10);
                Sector::new(
                    "HTDA",
                    "HTKJ",
                    format!("{hour:02}:{minute:02}"),
                    format!("{hour:02}:{:02}", minute + 6),
                )
            })
            .collect();
        assert_eq!(flight_minutes(&sectors), 60);
        assert!(approx(flight_time(&sectors), 1.0));
        // (07:36 + 15m) - (06:00 + 45m)
        assert_eq!(duty_minutes(&sectors, &DutyBuffers::default()), 66);
    }

    #[test]
    fn empty_sector_list_is_zero() {
        let none: [Sector; 0] = [];
        assert!(approx(flight_time(&none), 0.0));
        assert!(approx(duty_time(&none, &DutyBuffers::default()), 0.0));
        assert!(duty_span(&none).is_none());
    }

    #[test]
    fn malformed_sector_is_left_out_of_the_span() {
        let sectors = [
            Sector::new("HTDA", "HKJK", "07:00", "08:00"),
            Sector::new("HKJK", "HTDA", "later", "18:00"),
        ];
        let span = duty_span(&sectors).unwrap();
        assert_eq!(span, DutySpan { start: 420, end: 480 });
    }

    #[test]
    fn totals_by_aircraft_counts_cycles() {
        let entries = vec![
            entry("5H-AAA", (2024, 1, 1), vec![
                Sector::new("HTDA", "HTKJ", "07:00", "08:00"),
                Sector::new("HTKJ", "HTDA", "09:00", "10:00"),
            ]),
            entry("5H-BBB", (2024, 1, 1), vec![Sector::new("HTDA", "HTZA", "07:00", "08:30")]),
            entry("5H-AAA", (2024, 1, 2), vec![Sector::new("HTDA", "HTZA", "07:00", "07:30")]),
        ];
        let totals = totals_by(&entries, &DutyBuffers::default(), |e| e.aircraft.clone());
        assert_eq!(totals["5H-AAA"].sectors, 3);
        assert_eq!(totals["5H-AAA"].flight_minutes, 150);
        assert_eq!(totals["5H-BBB"].sectors, 1);
    }

    #[test]
    fn entry_totals_ignore_incomplete_sectors() {
        let mut incomplete = Sector::new("HTDA", "", "07:00", "08:00");
        incomplete.flight_time = 1.0;
        let e = entry("5H-AAA", (2024, 1, 1), vec![
            Sector::new("HTDA", "HTKJ", "09:00", "10:00"),
            incomplete,
        ]);
        let totals = EntryTotals::of(&e, &DutyBuffers::default());
        assert_eq!(totals.sectors, 1);
        assert_eq!(totals.flight_minutes, 60);
    }
}
