//! Comparison of window totals against regulatory limits.

use serde::{Deserialize, Serialize};

use crate::rules::Limits;
use crate::window::PilotWindows;

/// Strict comparison of a minute total against an hour limit.
///
/// A total equal to its limit is not an exceedance.
#[allow(clippy::cast_precision_loss)]
pub fn exceeds(total_minutes: i64, limit_hours: f64) -> bool {
    total_minutes as f64 > limit_hours * 60.0
}

/// One flag per limited metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Exceedances {
    pub flight_time_7d: bool,
    pub flight_time_28d: bool,
    pub flight_time_365d: bool,
    pub duty_time_7d: bool,
    pub duty_time_28d: bool,
    pub duty_time_365d: bool,
    pub sectors_24h: bool,
}

impl Exceedances {
    pub fn classify(windows: &PilotWindows, limits: &Limits) -> Self {
        Self {
            flight_time_7d: exceeds(windows.days_7.flight_minutes, limits.flight_time_7d),
            flight_time_28d: exceeds(windows.days_28.flight_minutes, limits.flight_time_28d),
            flight_time_365d: exceeds(windows.days_365.flight_minutes, limits.flight_time_365d),
            duty_time_7d: exceeds(windows.days_7.duty_minutes, limits.duty_time_7d),
            duty_time_28d: exceeds(windows.days_28.duty_minutes, limits.duty_time_28d),
            duty_time_365d: exceeds(windows.days_365.duty_minutes, limits.duty_time_365d),
            sectors_24h: windows.hours_24.sectors > limits.sectors_24h,
        }
    }

    /// Logical OR of every flag.
    pub const fn any(&self) -> bool {
        self.flight_time_7d
            || self.flight_time_28d
            || self.flight_time_365d
            || self.duty_time_7d
            || self.duty_time_28d
            || self.duty_time_365d
            || self.sectors_24h
    }

    /// Names of the exceeded metrics, for display.
    pub fn exceeded(&self) -> Vec<&'static str> {
        [
            (self.flight_time_7d, "flight_time_7d"),
            (self.flight_time_28d, "flight_time_28d"),
            (self.flight_time_365d, "flight_time_365d"),
            (self.duty_time_7d, "duty_time_7d"),
            (self.duty_time_28d, "duty_time_28d"),
            (self.duty_time_365d, "duty_time_365d"),
            (self.sectors_24h, "sectors_24h"),
        ]
        .into_iter()
        .filter_map(|(flag, name)| flag.then_some(name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

    use crate::entry::{LogEntry, Sector};
    use crate::rules::{DutyBuffers, REGULATORY_LIMITS};
    use crate::types::EntryId;
    use crate::window::WindowTotals;

    fn windows(flight_7d: i64, duty_28d: i64, sectors_24h: usize) -> PilotWindows {
        PilotWindows {
            hours_24: WindowTotals {
                sectors: sectors_24h,
                ..WindowTotals::default()
            },
            days_7: WindowTotals {
                flight_minutes: flight_7d,
                ..WindowTotals::default()
            },
            days_28: WindowTotals {
                flight_minutes: flight_7d,
                duty_minutes: duty_28d,
                sectors: 0,
            },
            days_365: WindowTotals {
                flight_minutes: flight_7d,
                ..WindowTotals::default()
            },
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        day(8).and_hms_opt(0, 0, 0).unwrap()
    }

    fn entry(date: NaiveDate, sectors: Vec<Sector>) -> LogEntry {
        LogEntry {
            id: EntryId::generate(),
            techlog_number: "TL-1".to_string(),
            date,
            aircraft: "5H-AAA".to_string(),
            pilot: "A. Smith".to_string(),
            co_pilot: None,
            sectors,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    /// One 06:00 sector whose duty, with the default buffers, is `duty` minutes.
    fn duty_day(date: NaiveDate, duty: i64) -> LogEntry {
        let landing = 6 * 60 + duty + 30;
        let landing = format!("{:02}:{:02}", landing / 60, landing % 60);
        entry(date, vec![Sector::new("HTDA", "HKJK", "06:00", landing)])
    }

    /// Ten six-minute hops; each stores 0.1 h of flight time.
    fn six_minute_hops(date: NaiveDate) -> LogEntry {
        let sectors = (0..10)
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
        entry(date, sectors)
    }

    fn classify(entries: &[LogEntry]) -> (PilotWindows, Exceedances) {
        let windows = PilotWindows::compute(entries, "A. Smith", now(), &DutyBuffers::default());
        (windows, Exceedances::classify(&windows, &REGULATORY_LIMITS))
    }

    #[test]
    fn limit_itself_is_not_an_exceedance() {
        let flags = Exceedances::classify(&windows(34 * 60, 190 * 60, 10), &REGULATORY_LIMITS);
        assert_eq!(flags, Exceedances::default());
        assert!(!flags.any());
    }

    #[test]
    fn just_above_limit_is_an_exceedance() {
        let over = windows(34 * 60 + 1, 190 * 60 + 1, 11);
        let flags = Exceedances::classify(&over, &REGULATORY_LIMITS);
        assert!(flags.flight_time_7d);
        assert!(!flags.flight_time_28d);
        assert!(flags.duty_time_28d);
        assert!(flags.sectors_24h);
        assert!(flags.any());
        assert_eq!(
            flags.exceeded(),
            vec!["flight_time_7d", "duty_time_28d", "sectors_24h"]
        );
    }

    #[test]
    fn duty_summed_to_exactly_55_hours_is_not_flagged() {
        let duties = [270, 599, 345, 240, 455, 263, 598, 352, 178];
        let mut entries: Vec<LogEntry> = duties
            .iter()
            .zip([1, 2, 2, 3, 4, 5, 6, 7, 8])
            .map(|(&duty, d)| duty_day(day(d), duty))
            .collect();

        let (windows, flags) = classify(&entries);
        assert_eq!(windows.days_7.duty_minutes, 55 * 60);
        assert!(!flags.duty_time_7d);

        entries.push(duty_day(day(8), 1));
        let (windows, flags) = classify(&entries);
        assert_eq!(windows.days_7.duty_minutes, 55 * 60 + 1);
        assert!(flags.duty_time_7d);
    }

    #[test]
    fn flight_summed_to_exactly_34_hours_is_not_flagged() {
        let mut entries: Vec<LogEntry> = (0..34).map(|i| six_minute_hops(day(1 + i % 6))).collect();

        let (windows, flags) = classify(&entries);
        assert_eq!(windows.days_7.flight_minutes, 34 * 60);
        assert_eq!(windows.days_7.sectors, 340);
        assert!(!flags.flight_time_7d);
        assert!(!flags.any());

        entries.push(entry(day(6), vec![Sector::new("HTDA", "HTKJ", "09:00", "09:01")]));
        let (_, flags) = classify(&entries);
        assert!(flags.flight_time_7d);
    }

    #[test]
    fn any_is_or_of_single_flag() {
        let flags = Exceedances {
            duty_time_365d: true,
            ..Exceedances::default()
        };
        assert!(flags.any());
    }

    #[test]
    fn exceeds_is_strict() {
        assert!(!exceeds(60_000, 1000.0));
        assert!(exceeds(60_001, 1000.0));
    }
}
