//! Core data model, time grid, rounding, and RNG helpers shared by every
//! stage of the planning pipeline.

pub mod capacity_load;
pub mod config;
pub mod error;
pub mod execution;
pub mod forecast;
pub mod order;
pub mod product;
pub mod repository;
pub mod rng;
pub mod routing;
pub mod rounding;
pub mod stock_params;
pub mod supplier;
pub mod time_grid;
pub mod warehouse;
pub mod work_center;
pub mod ztable;

pub use capacity_load::{CapacityLoad, Suggestion};
pub use config::MrpRunParams;
pub use error::{MrpError, Result};
pub use execution::{all_steps_completed, Execution, ExecutionStatus, StepLog, StepStatus, STEP_NAMES};
pub use forecast::ForecastPoint;
pub use order::{OrderKind, OrderStatus, PlannedOrder, Priority};
pub use product::{BomLine, LotSizingTag, Product, ProductKind};
pub use repository::memory::InMemoryRepository;
pub use repository::MrpRepository;
pub use rng::Mulberry32;
pub use routing::{lowest_sequence_step, RoutingStep};
pub use rounding::{round2, round4};
pub use stock_params::{SafetyStockMethod, StockParams};
pub use supplier::{select_supplier_link, Supplier, SupplierLink};
pub use time_grid::{in_bucket, week_start, weekday_in_set, weekly_buckets, WeekBucket};
pub use warehouse::{net_available_stock, InventorySnapshot, Warehouse};
pub use work_center::{CalendarDay, CalendarDayType, ScheduledStop, Shift, WorkCenter};
pub use ztable::z_for_service_level;
