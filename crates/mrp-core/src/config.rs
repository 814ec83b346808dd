use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time_grid::week_start;

/// Run-scoped parameters for a planning execution (§4.2, §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MrpRunParams {
    pub planning_horizon_weeks: u32,
    pub firm_order_horizon_weeks: u32,
    pub start_date: Option<DateTime<Utc>>,
    pub force_recalculate: bool,
    pub monte_carlo_iterations: u32,
}

impl Default for MrpRunParams {
    fn default() -> Self {
        Self {
            planning_horizon_weeks: 13,
            firm_order_horizon_weeks: 2,
            start_date: None,
            force_recalculate: false,
            monte_carlo_iterations: 10_000,
        }
    }
}

impl MrpRunParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_planning_horizon_weeks(mut self, weeks: u32) -> Self {
        self.planning_horizon_weeks = weeks;
        self
    }

    pub fn with_firm_order_horizon_weeks(mut self, weeks: u32) -> Self {
        self.firm_order_horizon_weeks = weeks;
        self
    }

    pub fn with_start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_force_recalculate(mut self, force: bool) -> Self {
        self.force_recalculate = force;
        self
    }

    pub fn with_monte_carlo_iterations(mut self, n: u32) -> Self {
        self.monte_carlo_iterations = n;
        self
    }

    /// The effective planning start, defaulting to `weekStart(now)` (§4.2).
    pub fn effective_start_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.start_date.unwrap_or_else(|| week_start(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let params = MrpRunParams::default();
        assert_eq!(params.planning_horizon_weeks, 13);
        assert_eq!(params.firm_order_horizon_weeks, 2);
        assert_eq!(params.monte_carlo_iterations, 10_000);
    }

    #[test]
    fn effective_start_date_falls_back_to_week_start() {
        use chrono::TimeZone;
        let now = Utc.with_ymd_and_hms(2026, 1, 7, 15, 30, 0).unwrap();
        let params = MrpRunParams::default();
        assert_eq!(params.effective_start_date(now), week_start(now));
    }
}
