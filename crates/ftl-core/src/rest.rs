//! Inter-duty rest periods.
//!
//! Rest runs from the end of one flying day's duty to the start of the next
//! flying day's duty for the same pilot. Only chronologically adjacent days
//! are paired; a day without usable boundary times drops its pairs rather
//! than counting as a violation.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::duty::DailyDutySummary;
use crate::rules::{DutyBuffers, MINIMUM_REST_HOURS};
use crate::window::Window;

/// True when `hours` meets the minimum rest requirement.
pub fn is_sufficient_rest(hours: f64) -> bool {
    hours >= MINIMUM_REST_HOURS
}

/// Rest between two adjacent flying days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestPeriod {
    /// Date of the duty the rest follows.
    pub after: NaiveDate,
    /// Date of the duty the rest precedes.
    pub before: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub hours: f64,
    pub compliant: bool,
}

/// Pairs adjacent days and measures the rest between them.
///
/// `days` must be sorted ascending by date.
pub fn rest_periods(days: &[DailyDutySummary], buffers: &DutyBuffers) -> Vec<RestPeriod> {
    days.windows(2)
        .filter_map(|pair| {
            let (previous, next) = (&pair[0], &pair[1]);
            let (Some(landing), Some(takeoff)) = (previous.last_landing, next.first_takeoff)
            else {
                tracing::warn!(
                    after = %previous.date,
                    before = %next.date,
                    "rest boundary missing, pair skipped"
                );
                return None;
            };
            let start = landing + buffers.release_offset();
            let end = takeoff + buffers.report_offset();
            let hours = clock::minutes_to_hours((end - start).num_minutes());
            Some(RestPeriod {
                after: previous.date,
                before: next.date,
                start,
                end,
                hours,
                compliant: is_sufficient_rest(hours),
            })
        })
        .collect()
}

/// Rest history plus the trailing-7-day view for one pilot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestEvaluation {
    /// Every measurable rest period, oldest first.
    pub history: Vec<RestPeriod>,
    /// Periods whose following duty date is within the trailing 7 days.
    pub recent: Vec<RestPeriod>,
    /// Flying days that ended away from home base.
    pub overnights_total: usize,
    /// Overnight days within the trailing 7 days.
    pub overnights_recent: usize,
}

impl RestEvaluation {
    /// Accepts daily summaries in any order.
    pub fn evaluate(days: &[DailyDutySummary], now: NaiveDateTime, buffers: &DutyBuffers) -> Self {
        let mut ascending: Vec<DailyDutySummary> = days.to_vec();
        ascending.sort_by_key(|day| day.date);

        let history = rest_periods(&ascending, buffers);
        let recent: Vec<RestPeriod> = history
            .iter()
            .filter(|period| Window::Days7.contains(period.before, now))
            .cloned()
            .collect();

        let overnights_total = ascending.iter().filter(|day| day.overnight).count();
        let overnights_recent = ascending
            .iter()
            .filter(|day| day.overnight && Window::Days7.contains(day.date, now))
            .count();

        Self {
            history,
            recent,
            overnights_total,
            overnights_recent,
        }
    }

    /// Pass/fail over the recent view: no recent pairs, or all compliant.
    pub fn recent_compliant(&self) -> bool {
        self.recent.iter().all(|period| period.compliant)
    }

    /// Non-compliant periods across the full history.
    pub fn violations(&self) -> impl Iterator<Item = &RestPeriod> {
        self.history.iter().filter(|period| !period.compliant)
    }
}
