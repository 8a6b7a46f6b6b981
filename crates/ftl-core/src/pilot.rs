//! Per-pilot statistics and the fleet-wide overview.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::duty::{DailyDutySummary, daily_duty_summaries};
use crate::entry::LogEntry;
use crate::exceedance::Exceedances;
use crate::rest::RestEvaluation;
use crate::rules::RuleSet;
use crate::window::PilotWindows;

/// Window totals and exceedance flags for one pilot at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotStats {
    pub pilot: String,
    pub evaluated_at: NaiveDateTime,
    pub windows: PilotWindows,
    pub exceedances: Exceedances,
}

impl PilotStats {
    pub fn compute(entries: &[LogEntry], pilot: &str, now: NaiveDateTime, rules: &RuleSet) -> Self {
        let windows = PilotWindows::compute(entries, pilot, now, &rules.buffers);
        let exceedances = Exceedances::classify(&windows, &rules.limits);
        if exceedances.any() {
            tracing::debug!(pilot, exceeded = ?exceedances.exceeded(), "limits exceeded");
        }
        Self {
            pilot: pilot.to_string(),
            evaluated_at: now,
            windows,
            exceedances,
        }
    }

    pub const fn has_exceedance(&self) -> bool {
        self.exceedances.any()
    }
}

/// Distinct pilot and co-pilot names, sorted.
pub fn pilot_roster(entries: &[LogEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| std::iter::once(&entry.pilot).chain(entry.co_pilot.as_ref()))
        .filter(|name| !name.trim().is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Statistics for every rostered pilot, sorted by name.
pub fn fleet_overview(
    entries: &[LogEntry],
    now: NaiveDateTime,
    rules: &RuleSet,
) -> Vec<PilotStats> {
    let roster = pilot_roster(entries);
    let overview: Vec<PilotStats> = roster
        .par_iter()
        .map(|pilot| PilotStats::compute(entries, pilot, now, rules))
        .collect();
    tracing::debug!(
        pilots = overview.len(),
        exceeding = overview.iter().filter(|s| s.has_exceedance()).count(),
        "computed fleet overview"
    );
    overview
}

/// Everything shown for one pilot: windows, flying days and rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotReport {
    pub stats: PilotStats,
    /// Newest first.
    pub duty_days: Vec<DailyDutySummary>,
    pub rest: RestEvaluation,
}

impl PilotReport {
    pub fn build(entries: &[LogEntry], pilot: &str, now: NaiveDateTime, rules: &RuleSet) -> Self {
        let duty_days = daily_duty_summaries(entries, pilot, rules);
        let rest = RestEvaluation::evaluate(&duty_days, now, &rules.buffers);
        Self {
            stats: PilotStats::compute(entries, pilot, now, rules),
            duty_days,
            rest,
        }
    }

    /// No limit exceeded and recent rest all compliant.
    pub fn is_compliant(&self) -> bool {
        !self.stats.has_exceedance() && self.rest.recent_compliant()
    }
}
