use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One (execution, product, week) forecast quantile row (§3). Only points
/// belonging to the latest `COMPLETED` forecast execution are used (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub execution_id: String,
    pub product_id: String,
    pub period_start: DateTime<Utc>,
    pub p10: Option<Decimal>,
    pub p50: Option<Decimal>,
    pub p75: Option<Decimal>,
    pub p90: Option<Decimal>,
}

impl ForecastPoint {
    pub fn new(execution_id: impl Into<String>, product_id: impl Into<String>, period_start: DateTime<Utc>) -> Self {
        Self {
            execution_id: execution_id.into(),
            product_id: product_id.into(),
            period_start,
            p10: None,
            p50: None,
            p75: None,
            p90: None,
        }
    }

    pub fn with_p10(mut self, v: Decimal) -> Self {
        self.p10 = Some(v);
        self
    }

    pub fn with_p50(mut self, v: Decimal) -> Self {
        self.p50 = Some(v);
        self
    }

    pub fn with_p75(mut self, v: Decimal) -> Self {
        self.p75 = Some(v);
        self
    }

    pub fn with_p90(mut self, v: Decimal) -> Self {
        self.p90 = Some(v);
        self
    }

    /// The TFT quantile used by the safety-stock formula (§4.3): p75 for a
    /// 0.90 service level, p90 otherwise (nearest fallback = p90), nulls
    /// treated as 0.
    pub fn quantile_for_service_level(&self, service_level: f64) -> Decimal {
        let value = if (service_level - 0.90).abs() < f64::EPSILON {
            self.p75
        } else {
            self.p90
        };
        value.unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point() -> ForecastPoint {
        ForecastPoint::new("E1", "P", Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap())
            .with_p75(Decimal::from(100))
            .with_p90(Decimal::from(150))
    }

    #[test]
    fn picks_p75_at_90_percent() {
        assert_eq!(point().quantile_for_service_level(0.90), Decimal::from(100));
    }

    #[test]
    fn picks_p90_elsewhere() {
        assert_eq!(point().quantile_for_service_level(0.95), Decimal::from(150));
        assert_eq!(point().quantile_for_service_level(0.99), Decimal::from(150));
    }

    #[test]
    fn null_quantile_treated_as_zero() {
        let p = ForecastPoint::new("E1", "P", Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap());
        assert_eq!(p.quantile_for_service_level(0.95), Decimal::ZERO);
    }
}
