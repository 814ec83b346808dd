//! Orchestrates the eight-stage planning pipeline (MPS, stock parameters,
//! BOM explosion and netting, lot sizing, order generation, action
//! messages, capacity requirements planning, and storage validation) over
//! an [`mrp_core::MrpRepository`].

pub mod orchestrator;

pub use mrp_core::{Execution, ExecutionStatus, MrpError, MrpRunParams, Result, StepLog};
pub use orchestrator::{run_mrp, RunOutcome};
