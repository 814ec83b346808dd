use thiserror::Error;

#[derive(Error, Debug)]
pub enum BomError {
    /// Stage 3 of the planning pipeline: DFS found a back edge while walking
    /// the BOM graph. The message lists the full cycle path, ending at the
    /// node that closes the loop.
    #[error("CIRCULAR_BOM: cycle detected: {0}")]
    CircularBom(String),

    #[error("product not found in BOM graph: {0}")]
    ProductNotFound(String),
}

pub type Result<T> = std::result::Result<T, BomError>;
