//! Capacity requirements planning and storage validation — stages 7 and 8
//! of the planning pipeline.

pub mod capacity;
pub mod storage;

pub use capacity::{available_hours, build_capacity_load, planned_hours};
pub use storage::{project_storage, StorageProjection, StorageSeverity, VolumeDelta};
