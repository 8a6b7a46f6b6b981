//! Regulatory constants and the duty buffer convention.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default home-base airport code.
pub const DEFAULT_HOME_BASE: &str = "HTDA";

/// Minimum inter-duty rest, in hours.
pub const MINIMUM_REST_HOURS: f64 = 36.0;

/// Offsets applied to the first takeoff and last landing of a duty.
///
/// Duty starts at earliest takeoff + `report_offset_minutes` and ends at
/// latest landing + `release_offset_minutes`. The same pair bounds rest
/// periods, so duty and rest never disagree about where a duty begins or ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyBuffers {
    pub report_offset_minutes: i64,
    pub release_offset_minutes: i64,
}

impl Default for DutyBuffers {
    fn default() -> Self {
        Self {
            report_offset_minutes: 45,
            release_offset_minutes: 15,
        }
    }
}

impl DutyBuffers {
    pub fn report_offset(&self) -> Duration {
        Duration::minutes(self.report_offset_minutes)
    }

    pub fn release_offset(&self) -> Duration {
        Duration::minutes(self.release_offset_minutes)
    }
}

/// Regulatory thresholds. A total strictly above its limit is an exceedance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub flight_time_7d: f64,
    pub flight_time_28d: f64,
    pub flight_time_365d: f64,
    pub duty_time_7d: f64,
    pub duty_time_28d: f64,
    pub duty_time_365d: f64,
    pub sectors_24h: usize,
}

/// The fixed flight time limitation thresholds.
pub const REGULATORY_LIMITS: Limits = Limits {
    flight_time_7d: 34.0,
    flight_time_28d: 100.0,
    flight_time_365d: 1000.0,
    duty_time_7d: 55.0,
    duty_time_28d: 190.0,
    duty_time_365d: 1800.0,
    sectors_24h: 10,
};

impl Default for Limits {
    fn default() -> Self {
        REGULATORY_LIMITS
    }
}

/// Everything an evaluation needs besides the entries and `now`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Arrival code that ends a day at home; anything else is an overnight.
    pub home_base: String,
    pub buffers: DutyBuffers,
    pub limits: Limits,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            home_base: DEFAULT_HOME_BASE.to_string(),
            buffers: DutyBuffers::default(),
            limits: REGULATORY_LIMITS,
        }
    }
}

impl RuleSet {
    /// True when `arrival` is the home base (case-insensitive).
    pub fn is_home(&self, arrival: &str) -> bool {
        arrival.trim().eq_ignore_ascii_case(self.home_base.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_buffers_are_45_and_15() {
        let buffers = DutyBuffers::default();
        assert_eq!(buffers.report_offset(), Duration::minutes(45));
        assert_eq!(buffers.release_offset(), Duration::minutes(15));
    }

    #[test]
    fn home_base_match_ignores_case_and_padding() {
        let rules = RuleSet::default();
        assert!(rules.is_home("HTDA"));
        assert!(rules.is_home(" htda"));
        assert!(!rules.is_home("HKJK"));
    }

    #[test]
    fn buffers_deserialize_from_config_shape() {
        let buffers: DutyBuffers =
            serde_json::from_str(r#"{"report_offset_minutes":60,"release_offset_minutes":30}"#)
                .unwrap();
        assert_eq!(buffers.report_offset_minutes, 60);
        assert_eq!(buffers.release_offset_minutes, 30);
    }
}
