use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyStockMethod {
    TftQuantile,
    Classical,
    MonteCarlo,
}

/// Computed stock policy for one (execution, product) pair (§3, §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockParams {
    pub execution_id: String,
    pub product_id: String,
    pub safety_stock: Decimal,
    pub reorder_point: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    pub eoq: Decimal,
    pub method: SafetyStockMethod,
    pub service_level: f64,
    pub computed_at: DateTime<Utc>,
}

impl StockParams {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        execution_id: impl Into<String>,
        product_id: impl Into<String>,
        safety_stock: Decimal,
        reorder_point: Decimal,
        min: Decimal,
        max: Decimal,
        eoq: Decimal,
        method: SafetyStockMethod,
        service_level: f64,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            execution_id: execution_id.into(),
            product_id: product_id.into(),
            safety_stock,
            reorder_point,
            min,
            max,
            eoq,
            method,
            service_level,
            computed_at,
        }
    }
}
