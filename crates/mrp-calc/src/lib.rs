//! The planning calculation engine: MPS, safety stock, netting, lot sizing,
//! order generation, and action messages — stages 1 and 3 through 6 of the
//! pipeline (stage 2, BOM explosion, lives in `bom-calc`; stages 7 and 8 in
//! `mrp-optimizer`).

pub mod action_messages;
pub mod lot_sizing;
pub mod mps;
pub mod netting;
pub mod order_generation;
pub mod stock_params;

pub use action_messages::{diff_orders, ActionKind, ActionMessage};
pub use lot_sizing::{apply_lot_sizing, LotSizeOrder, LotSizeReceipt, LotSizingParams};
pub use mps::{compute_mps, MpsLine, MpsResult};
pub use netting::{net_requirements, NetRequirement};
pub use order_generation::{classify_priority, generate_orders, OrderGenerationWarning};
pub use stock_params::{
    classical_safety_stock, eoq, max_level, min_level, monte_carlo_safety_stock, reorder_point,
    select_safety_stock, DemandProfile, MonteCarloDetail, SafetyStockResult,
};
