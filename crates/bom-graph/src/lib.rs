pub mod arena;
pub mod cycle;
pub mod levels;

pub use arena::{Arena, EdgeIndex, NodeIndex};
pub use cycle::validate_acyclic;
pub use levels::{level_grouping, low_level_codes};
