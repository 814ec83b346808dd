use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weight of a parent -> child edge in the BOM graph: how much of the child
/// is consumed per unit of the parent, plus the scrap/loss percentage applied
/// on top of the raw quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BomEdge {
    pub quantity_per_parent: Decimal,
    pub loss_percent: Decimal,
}

impl BomEdge {
    pub fn new(quantity_per_parent: Decimal, loss_percent: Decimal) -> Self {
        Self {
            quantity_per_parent,
            loss_percent,
        }
    }

    /// `childQty = parentQty * bomQty * (1 + loss/100)`, per §4.4 step 4.
    pub fn propagate(&self, parent_qty: Decimal) -> Decimal {
        let hundred = Decimal::from(100);
        parent_qty * self.quantity_per_parent * (Decimal::ONE + self.loss_percent / hundred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propagate_applies_loss() {
        let edge = BomEdge::new(Decimal::from(2), Decimal::from(5));
        let qty = edge.propagate(Decimal::from(100));
        assert_eq!(qty, Decimal::new(2100, 1)); // 210.0
    }

    #[test]
    fn propagate_no_loss() {
        let edge = BomEdge::new(Decimal::from(3), Decimal::ZERO);
        assert_eq!(edge.propagate(Decimal::from(100)), Decimal::from(300));
    }
}
