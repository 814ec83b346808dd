//! External-store access (§1 "Out of scope: persistent store"; §6). The
//! pipeline reads reference data and writes results through this trait;
//! implementations own persistence, transactions, and query plans.

use crate::{
    BomLine, CalendarDay, CapacityLoad, Execution, ForecastPoint, InventorySnapshot, PlannedOrder,
    Product, Result, RoutingStep, StepLog, StockParams, Supplier, SupplierLink, WorkCenter,
};

pub trait MrpRepository: Send + Sync {
    fn active_products(&self) -> Result<Vec<Product>>;
    fn product(&self, id: &str) -> Result<Product>;
    fn bom_lines(&self) -> Result<Vec<BomLine>>;
    fn supplier_links(&self, product_id: &str) -> Result<Vec<SupplierLink>>;
    fn supplier(&self, id: &str) -> Result<Option<Supplier>>;
    fn routing_steps(&self, product_id: &str) -> Result<Vec<RoutingStep>>;
    fn work_centers(&self) -> Result<Vec<WorkCenter>>;
    fn calendar_days(&self) -> Result<Vec<CalendarDay>>;
    fn warehouses(&self) -> Result<Vec<crate::Warehouse>>;
    fn inventory_snapshots(&self) -> Result<Vec<InventorySnapshot>>;
    fn latest_completed_forecast_points(&self) -> Result<Vec<ForecastPoint>>;
    fn firm_orders(&self) -> Result<Vec<PlannedOrder>>;
    fn existing_orders(&self) -> Result<Vec<PlannedOrder>>;
    /// Most recent `StockParams` row saved for each product, across all
    /// prior executions. Used to honor `forceRecalculate=false` (§4.11).
    fn latest_stock_params(&self) -> Result<Vec<StockParams>>;

    fn save_execution(&self, execution: &Execution) -> Result<()>;
    fn save_step_log(&self, log: &StepLog) -> Result<()>;
    fn save_orders(&self, orders: &[PlannedOrder]) -> Result<()>;
    fn save_stock_params(&self, params: &[StockParams]) -> Result<()>;
    fn save_capacity_loads(&self, loads: &[CapacityLoad]) -> Result<()>;
    fn running_execution_count(&self) -> Result<usize>;
}

/// In-memory implementation for tests and demos.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryRepository {
        products: RwLock<HashMap<String, Product>>,
        bom_lines: RwLock<Vec<BomLine>>,
        supplier_links: RwLock<Vec<SupplierLink>>,
        suppliers: RwLock<HashMap<String, Supplier>>,
        routing_steps: RwLock<Vec<RoutingStep>>,
        work_centers: RwLock<Vec<WorkCenter>>,
        calendar_days: RwLock<Vec<CalendarDay>>,
        warehouses: RwLock<Vec<crate::Warehouse>>,
        inventory_snapshots: RwLock<Vec<InventorySnapshot>>,
        forecast_points: RwLock<Vec<ForecastPoint>>,
        firm_orders: RwLock<Vec<PlannedOrder>>,
        existing_orders: RwLock<Vec<PlannedOrder>>,
        executions: RwLock<Vec<Execution>>,
        step_logs: RwLock<Vec<StepLog>>,
        stock_params: RwLock<Vec<StockParams>>,
        capacity_loads: RwLock<Vec<CapacityLoad>>,
    }

    impl InMemoryRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_product(&self, product: Product) {
            self.products.write().unwrap().insert(product.id.clone(), product);
        }

        pub fn add_bom_line(&self, line: BomLine) {
            self.bom_lines.write().unwrap().push(line);
        }

        pub fn add_supplier_link(&self, link: SupplierLink) {
            self.supplier_links.write().unwrap().push(link);
        }

        pub fn add_supplier(&self, supplier: Supplier) {
            self.suppliers.write().unwrap().insert(supplier.id.clone(), supplier);
        }

        pub fn add_routing_step(&self, step: RoutingStep) {
            self.routing_steps.write().unwrap().push(step);
        }

        pub fn add_work_center(&self, wc: WorkCenter) {
            self.work_centers.write().unwrap().push(wc);
        }

        pub fn add_calendar_day(&self, day: CalendarDay) {
            self.calendar_days.write().unwrap().push(day);
        }

        pub fn add_warehouse(&self, wh: crate::Warehouse) {
            self.warehouses.write().unwrap().push(wh);
        }

        pub fn add_inventory_snapshot(&self, snap: InventorySnapshot) {
            self.inventory_snapshots.write().unwrap().push(snap);
        }

        pub fn add_forecast_point(&self, point: ForecastPoint) {
            self.forecast_points.write().unwrap().push(point);
        }

        pub fn add_firm_order(&self, order: PlannedOrder) {
            self.firm_orders.write().unwrap().push(order);
        }

        pub fn add_existing_order(&self, order: PlannedOrder) {
            self.existing_orders.write().unwrap().push(order);
        }
    }

    impl MrpRepository for InMemoryRepository {
        fn active_products(&self) -> Result<Vec<Product>> {
            Ok(self.products.read().unwrap().values().filter(|p| p.active).cloned().collect())
        }

        fn product(&self, id: &str) -> Result<Product> {
            self.products
                .read()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| crate::MrpError::ProductNotFound(id.to_string()))
        }

        fn bom_lines(&self) -> Result<Vec<BomLine>> {
            Ok(self.bom_lines.read().unwrap().clone())
        }

        fn supplier_links(&self, product_id: &str) -> Result<Vec<SupplierLink>> {
            Ok(self
                .supplier_links
                .read()
                .unwrap()
                .iter()
                .filter(|l| l.product_id == product_id)
                .cloned()
                .collect())
        }

        fn supplier(&self, id: &str) -> Result<Option<Supplier>> {
            Ok(self.suppliers.read().unwrap().get(id).cloned())
        }

        fn routing_steps(&self, product_id: &str) -> Result<Vec<RoutingStep>> {
            Ok(self
                .routing_steps
                .read()
                .unwrap()
                .iter()
                .filter(|s| s.product_id == product_id)
                .cloned()
                .collect())
        }

        fn work_centers(&self) -> Result<Vec<WorkCenter>> {
            Ok(self.work_centers.read().unwrap().clone())
        }

        fn calendar_days(&self) -> Result<Vec<CalendarDay>> {
            Ok(self.calendar_days.read().unwrap().clone())
        }

        fn warehouses(&self) -> Result<Vec<crate::Warehouse>> {
            Ok(self.warehouses.read().unwrap().clone())
        }

        fn inventory_snapshots(&self) -> Result<Vec<InventorySnapshot>> {
            Ok(self.inventory_snapshots.read().unwrap().clone())
        }

        fn latest_completed_forecast_points(&self) -> Result<Vec<ForecastPoint>> {
            Ok(self.forecast_points.read().unwrap().clone())
        }

        fn firm_orders(&self) -> Result<Vec<PlannedOrder>> {
            Ok(self.firm_orders.read().unwrap().clone())
        }

        fn existing_orders(&self) -> Result<Vec<PlannedOrder>> {
            Ok(self.existing_orders.read().unwrap().clone())
        }

        fn latest_stock_params(&self) -> Result<Vec<StockParams>> {
            let mut latest: HashMap<String, StockParams> = HashMap::new();
            for params in self.stock_params.read().unwrap().iter() {
                match latest.get(&params.product_id) {
                    Some(existing) if existing.computed_at >= params.computed_at => {}
                    _ => {
                        latest.insert(params.product_id.clone(), params.clone());
                    }
                }
            }
            Ok(latest.into_values().collect())
        }

        fn save_execution(&self, execution: &Execution) -> Result<()> {
            let mut executions = self.executions.write().unwrap();
            if let Some(existing) = executions.iter_mut().find(|e| e.id == execution.id) {
                *existing = execution.clone();
            } else {
                executions.push(execution.clone());
            }
            Ok(())
        }

        fn save_step_log(&self, log: &StepLog) -> Result<()> {
            self.step_logs.write().unwrap().push(log.clone());
            Ok(())
        }

        fn save_orders(&self, orders: &[PlannedOrder]) -> Result<()> {
            self.existing_orders.write().unwrap().extend(orders.iter().cloned());
            Ok(())
        }

        fn save_stock_params(&self, params: &[StockParams]) -> Result<()> {
            self.stock_params.write().unwrap().extend(params.iter().cloned());
            Ok(())
        }

        fn save_capacity_loads(&self, loads: &[CapacityLoad]) -> Result<()> {
            self.capacity_loads.write().unwrap().extend(loads.iter().cloned());
            Ok(())
        }

        fn running_execution_count(&self) -> Result<usize> {
            Ok(self
                .executions
                .read()
                .unwrap()
                .iter()
                .filter(|e| e.status == crate::ExecutionStatus::Running)
                .count())
        }
    }
}
