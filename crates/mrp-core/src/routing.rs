use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One step of a product's routing (§3): an ordered set of (product,
/// work-center) operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingStep {
    pub product_id: String,
    pub work_center_id: String,
    pub sequence: u32,
    pub setup_minutes: Decimal,
    pub per_unit_minutes: Decimal,
}

impl RoutingStep {
    pub fn new(product_id: impl Into<String>, work_center_id: impl Into<String>, sequence: u32) -> Self {
        Self {
            product_id: product_id.into(),
            work_center_id: work_center_id.into(),
            sequence,
            setup_minutes: Decimal::ZERO,
            per_unit_minutes: Decimal::ZERO,
        }
    }

    pub fn with_setup_minutes(mut self, m: Decimal) -> Self {
        self.setup_minutes = m;
        self
    }

    pub fn with_per_unit_minutes(mut self, m: Decimal) -> Self {
        self.per_unit_minutes = m;
        self
    }

    /// Minutes required to run `quantity` units through this step.
    pub fn minutes_for(&self, quantity: Decimal) -> Decimal {
        self.setup_minutes + quantity * self.per_unit_minutes
    }
}

/// The routing step with the lowest sequence number among `steps` for a
/// given product (§4.7 "work-center = routing step with lowest sequence").
pub fn lowest_sequence_step<'a>(steps: &'a [RoutingStep], product_id: &str) -> Option<&'a RoutingStep> {
    steps
        .iter()
        .filter(|s| s.product_id == product_id)
        .min_by_key(|s| s.sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_lowest_sequence() {
        let steps = vec![
            RoutingStep::new("P", "WC2", 20),
            RoutingStep::new("P", "WC1", 10),
        ];
        let chosen = lowest_sequence_step(&steps, "P").unwrap();
        assert_eq!(chosen.work_center_id, "WC1");
    }

    #[test]
    fn minutes_for_includes_setup() {
        let step = RoutingStep::new("P", "WC1", 10)
            .with_setup_minutes(Decimal::from(30))
            .with_per_unit_minutes(Decimal::new(5, 1));
        assert_eq!(step.minutes_for(Decimal::from(100)), Decimal::from(80));
    }
}
