use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Escalation recommendation for an overloaded work center (§3, §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suggestion {
    Ok,
    Overtime,
    Expedite,
    Subcontract,
}

/// Per (execution, work-center, week) capacity projection (§3, §4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityLoad {
    pub execution_id: String,
    pub work_center_id: String,
    pub week_start: DateTime<Utc>,
    pub available_hours: Decimal,
    pub planned_hours: Decimal,
    pub utilization_percent: Decimal,
    pub overloaded: bool,
    pub excess_hours: Decimal,
    pub suggestion: Option<Suggestion>,
}

impl CapacityLoad {
    pub fn new(
        execution_id: impl Into<String>,
        work_center_id: impl Into<String>,
        week_start: DateTime<Utc>,
        available_hours: Decimal,
        planned_hours: Decimal,
    ) -> Self {
        let utilization_percent = if available_hours > Decimal::ZERO {
            (planned_hours / available_hours * Decimal::from(100)).round_dp(2)
        } else if planned_hours > Decimal::ZERO {
            Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        let overloaded = planned_hours > available_hours;
        let excess_hours = (planned_hours - available_hours).max(Decimal::ZERO);
        Self {
            execution_id: execution_id.into(),
            work_center_id: work_center_id.into(),
            week_start,
            available_hours,
            planned_hours,
            utilization_percent,
            overloaded,
            excess_hours,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn flags_overload_and_excess() {
        let week = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        let load = CapacityLoad::new("E1", "WC1", week, Decimal::from(40), Decimal::from(50));
        assert!(load.overloaded);
        assert_eq!(load.excess_hours, Decimal::from(10));
        assert_eq!(load.utilization_percent, Decimal::new(12500, 2));
    }

    #[test]
    fn zero_capacity_with_zero_load_is_not_overloaded() {
        let week = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        let load = CapacityLoad::new("E1", "WC1", week, Decimal::ZERO, Decimal::ZERO);
        assert!(!load.overloaded);
        assert_eq!(load.utilization_percent, Decimal::ZERO);
    }
}
