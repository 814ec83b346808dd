use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Buy,
    Make,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Planned,
    Firm,
    Released,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// A supply order synthesized by order generation (§4.7) and reconciled by
/// action messages (§4.8). Invariant 5: `release_date = needed_by −
/// lead_time_days`, `expected_receipt = needed_by`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedOrder {
    pub id: String,
    pub execution_id: String,
    pub product_id: String,
    pub kind: OrderKind,
    pub quantity: Decimal,
    pub needed_by: DateTime<Utc>,
    pub release_date: DateTime<Utc>,
    pub expected_receipt: DateTime<Utc>,
    pub supplier_id: Option<String>,
    pub work_center_id: Option<String>,
    pub estimated_cost: Decimal,
    pub lot_sizing_tag: crate::product::LotSizingTag,
    pub priority: Priority,
    pub status: OrderStatus,
    pub action_message: Option<String>,
}

impl PlannedOrder {
    pub fn new(
        id: impl Into<String>,
        execution_id: impl Into<String>,
        product_id: impl Into<String>,
        kind: OrderKind,
        quantity: Decimal,
        needed_by: DateTime<Utc>,
        lead_time_days: u32,
    ) -> Self {
        let release_date = needed_by - chrono::Duration::days(lead_time_days as i64);
        Self {
            id: id.into(),
            execution_id: execution_id.into(),
            product_id: product_id.into(),
            kind,
            quantity,
            needed_by,
            release_date,
            expected_receipt: needed_by,
            supplier_id: None,
            work_center_id: None,
            estimated_cost: Decimal::ZERO,
            lot_sizing_tag: crate::product::LotSizingTag::LotForLot,
            priority: Priority::Medium,
            status: OrderStatus::Planned,
            action_message: None,
        }
    }

    pub fn with_supplier_id(mut self, id: impl Into<String>) -> Self {
        self.supplier_id = Some(id.into());
        self
    }

    pub fn with_work_center_id(mut self, id: impl Into<String>) -> Self {
        self.work_center_id = Some(id.into());
        self
    }

    pub fn with_estimated_cost(mut self, cost: Decimal) -> Self {
        self.estimated_cost = cost;
        self
    }

    pub fn with_lot_sizing_tag(mut self, tag: crate::product::LotSizingTag) -> Self {
        self.lot_sizing_tag = tag;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_action_message(mut self, message: impl Into<String>) -> Self {
        self.action_message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn release_date_derived_from_lead_time() {
        let needed_by = Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap();
        let order = PlannedOrder::new("O1", "E1", "P", OrderKind::Buy, Decimal::from(10), needed_by, 7);
        assert_eq!(order.release_date, Utc.with_ymd_and_hms(2026, 2, 8, 0, 0, 0).unwrap());
        assert_eq!(order.expected_receipt, needed_by);
    }
}
