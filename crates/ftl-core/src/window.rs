//! Trailing-window totals for a pilot.
//!
//! Window membership is decided by the entry date alone: an entry is in a
//! window when its date at 00:00 falls in `[now - length, now]`. Individual
//! sector times do not move an entry in or out.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::aggregate::EntryTotals;
use crate::clock;
use crate::entry::LogEntry;
use crate::rules::DutyBuffers;

/// A trailing aggregation period ending at the evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    Hours24,
    Days7,
    Days28,
    Days365,
}

impl Window {
    pub const ALL: [Self; 4] = [Self::Hours24, Self::Days7, Self::Days28, Self::Days365];

    pub fn length(self) -> Duration {
        match self {
            Self::Hours24 => Duration::hours(24),
            Self::Days7 => Duration::days(7),
            Self::Days28 => Duration::days(28),
            Self::Days365 => Duration::days(365),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hours24 => "24h",
            Self::Days7 => "7d",
            Self::Days28 => "28d",
            Self::Days365 => "365d",
        }
    }

    /// True when `date` (taken at midnight) lies within the window, bounds inclusive.
    pub fn contains(self, date: NaiveDate, now: NaiveDateTime) -> bool {
        let instant = date.and_time(NaiveTime::MIN);
        instant >= now - self.length() && instant <= now
    }
}

/// Flight time, duty time and sectors summed over one window.
///
/// Times are held in whole minutes and serialized as hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowTotals {
    #[serde(rename = "flight_time", with = "clock::as_hours")]
    pub flight_minutes: i64,
    #[serde(rename = "duty_time", with = "clock::as_hours")]
    pub duty_minutes: i64,
    pub sectors: usize,
}

impl WindowTotals {
    pub fn flight_time(&self) -> f64 {
        clock::minutes_to_hours(self.flight_minutes)
    }

    pub fn duty_time(&self) -> f64 {
        clock::minutes_to_hours(self.duty_minutes)
    }
}

impl From<EntryTotals> for WindowTotals {
    fn from(totals: EntryTotals) -> Self {
        Self {
            flight_minutes: totals.flight_minutes,
            duty_minutes: totals.duty_minutes,
            sectors: totals.sectors,
        }
    }
}

/// Entries where `pilot` flew as pilot or co-pilot, in input order.
pub fn entries_for_pilot<'a>(
    entries: &'a [LogEntry],
    pilot: &'a str,
) -> impl Iterator<Item = &'a LogEntry> + Clone {
    entries.iter().filter(move |entry| entry.involves(pilot))
}

/// Totals for `pilot` over a single window ending at `now`.
pub fn window_totals(
    entries: &[LogEntry],
    pilot: &str,
    window: Window,
    now: NaiveDateTime,
    buffers: &DutyBuffers,
) -> WindowTotals {
    let mut totals = EntryTotals::default();
    for entry in entries_for_pilot(entries, pilot).filter(|e| window.contains(e.date, now)) {
        totals += EntryTotals::of(entry, buffers);
    }
    totals.into()
}

/// One aggregate triple per trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PilotWindows {
    pub hours_24: WindowTotals,
    pub days_7: WindowTotals,
    pub days_28: WindowTotals,
    pub days_365: WindowTotals,
}

impl PilotWindows {
    pub fn compute(
        entries: &[LogEntry],
        pilot: &str,
        now: NaiveDateTime,
        buffers: &DutyBuffers,
    ) -> Self {
        let totals = |window| window_totals(entries, pilot, window, now, buffers);
        Self {
            hours_24: totals(Window::Hours24),
            days_7: totals(Window::Days7),
            days_28: totals(Window::Days28),
            days_365: totals(Window::Days365),
        }
    }

    pub const fn get(&self, window: Window) -> &WindowTotals {
        match window {
            Window::Hours24 => &self.hours_24,
            Window::Days7 => &self.days_7,
            Window::Days28 => &self.days_28,
            Window::Days365 => &self.days_365,
        }
    }
}
