use thiserror::Error;

/// Error kinds propagated through the planning stages (§7). All terminate
/// the pipeline at the offending stage; the orchestrator is the only place
/// that catches them.
#[derive(Debug, Error)]
pub enum MrpError {
    /// Another Execution is already `RUNNING` (the single global concurrency
    /// guard, invariant 7).
    #[error("CONCURRENCY_CONFLICT: another execution is already running")]
    ConcurrencyConflict,

    /// Stage 3 found a cycle in the BOM graph; message includes the path.
    #[error("CIRCULAR_BOM: {0}")]
    CircularBom(String),

    /// Lot sizing was asked to route an unsupported tag.
    #[error("BAD_METHOD: unsupported lot-sizing method {0:?}")]
    BadMethod(String),

    /// Only raised by the standalone Monte-Carlo endpoint, never by the
    /// pipeline itself (which silently degrades to the classical method).
    #[error("INSUFFICIENT_HISTORY: need at least 12 weekly demand samples, found {0}")]
    InsufficientHistory(usize),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl From<bom_core::BomError> for MrpError {
    fn from(e: bom_core::BomError) -> Self {
        match e {
            bom_core::BomError::CircularBom(path) => MrpError::CircularBom(path),
            bom_core::BomError::ProductNotFound(id) => MrpError::ProductNotFound(id),
        }
    }
}

pub type Result<T> = std::result::Result<T, MrpError>;
