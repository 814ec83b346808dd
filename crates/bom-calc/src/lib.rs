pub mod explosion;

pub use explosion::{explode, PeriodMap, RequirementsMap};
