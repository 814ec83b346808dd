use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A storage location (§3). Must have `capacity_m3 > 0` to participate in
/// storage-volume validation (§4.10).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub capacity_m3: Decimal,
    pub active: bool,
}

impl Warehouse {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: String::new(),
            capacity_m3: Decimal::ZERO,
            active: true,
        }
    }

    pub fn with_capacity_m3(mut self, capacity: Decimal) -> Self {
        self.capacity_m3 = capacity;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether this warehouse can be validated for storage overflow (§4.10:
    /// capacity must be strictly positive).
    pub fn eligible_for_validation(&self) -> bool {
        self.active && self.capacity_m3 > Decimal::ZERO
    }
}

/// On-hand position of a product at a warehouse (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub warehouse_id: String,
    pub product_id: String,
    pub available_quantity: Decimal,
    pub reserved_quantity: Decimal,
}

impl InventorySnapshot {
    pub fn new(warehouse_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            warehouse_id: warehouse_id.into(),
            product_id: product_id.into(),
            available_quantity: Decimal::ZERO,
            reserved_quantity: Decimal::ZERO,
        }
    }

    pub fn with_available_quantity(mut self, qty: Decimal) -> Self {
        self.available_quantity = qty;
        self
    }

    pub fn with_reserved_quantity(mut self, qty: Decimal) -> Self {
        self.reserved_quantity = qty;
        self
    }

    pub fn net_available(&self) -> Decimal {
        self.available_quantity - self.reserved_quantity
    }
}

/// Available stock for MRP = Σ(available − reserved) over all warehouses for
/// that product (§3).
pub fn net_available_stock(snapshots: &[InventorySnapshot], product_id: &str) -> Decimal {
    snapshots
        .iter()
        .filter(|s| s.product_id == product_id)
        .map(InventorySnapshot::net_available)
        .sum()
}
