//! Daily duty summaries for one pilot.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::aggregate::{self, DutySpan};
use crate::clock;
use crate::entry::{LogEntry, Sector};
use crate::rules::RuleSet;
use crate::window::entries_for_pilot;

/// Everything a pilot flew on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDutySummary {
    pub date: NaiveDate,
    /// Complete sectors from every entry on the date, entry order then sector order.
    pub sectors: Vec<Sector>,
    /// Earliest takeoff on the date.
    pub first_takeoff: Option<NaiveDateTime>,
    /// Latest landing; may fall on the following date.
    pub last_landing: Option<NaiveDateTime>,
    pub flight_time: f64,
    pub duty_time: f64,
    pub sector_count: usize,
    /// Arrival of the final sector.
    pub last_arrival: Option<String>,
    /// The final sector did not end at the home base.
    pub overnight: bool,
}

impl DailyDutySummary {
    fn from_sectors(date: NaiveDate, sectors: Vec<Sector>, rules: &RuleSet) -> Self {
        let span = aggregate::duty_span(&sectors);
        let last_arrival = sectors.last().map(|sector| sector.arrival.clone());
        let overnight = last_arrival
            .as_deref()
            .is_some_and(|arrival| !rules.is_home(arrival));
        let minute = |m: i64| date.and_time(NaiveTime::MIN) + Duration::minutes(m);

        Self {
            date,
            first_takeoff: span.map(|DutySpan { start, .. }| minute(start)),
            last_landing: span.map(|DutySpan { end, .. }| minute(end)),
            flight_time: aggregate::flight_time(&sectors),
            duty_time: clock::minutes_to_hours(
                span.map_or(0, |s| s.duty_minutes(&rules.buffers)),
            ),
            sector_count: sectors.len(),
            last_arrival,
            overnight,
            sectors,
        }
    }
}

/// Groups a pilot's entries by date, newest date first.
///
/// Entries where the pilot is pilot or co-pilot are included. Within a date,
/// sectors keep entry order then sector order. Incomplete sectors are dropped;
/// dates left with no sectors are omitted.
pub fn daily_duty_summaries(
    entries: &[LogEntry],
    pilot: &str,
    rules: &RuleSet,
) -> Vec<DailyDutySummary> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Sector>> = BTreeMap::new();
    for entry in entries_for_pilot(entries, pilot) {
        by_date
            .entry(entry.date)
            .or_default()
            .extend(entry.complete_sectors().cloned());
    }

    let summaries: Vec<DailyDutySummary> = by_date
        .into_iter()
        .rev()
        .filter(|(_, sectors)| !sectors.is_empty())
        .map(|(date, sectors)| DailyDutySummary::from_sectors(date, sectors, rules))
        .collect();

    tracing::debug!(pilot, days = summaries.len(), "grouped daily duty");
    summaries
}
