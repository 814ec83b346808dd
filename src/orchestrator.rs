//! The 8-stage pipeline orchestrator (§4.11): concurrency guard, sequential
//! stage execution with fail-fast, and the derived-input plumbing between
//! stages.

use bom_core::BomEdge;
use bom_graph::Arena;
use chrono::{DateTime, Duration, Utc};
use mrp_calc::{
    apply_lot_sizing, classify_priority, compute_mps, diff_orders, generate_orders,
    net_requirements, select_safety_stock, DemandProfile, LotSizingParams,
};
use mrp_core::{
    round4, weekly_buckets, Execution, ExecutionStatus, MrpError, MrpRepository, MrpRunParams,
    Mulberry32, OrderStatus, Product, ProductKind, Result, StepLog, StockParams,
};
use mrp_optimizer::{available_hours, build_capacity_load, project_storage, VolumeDelta};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Everything produced by one pipeline run, ready to hand back to a caller
/// that doesn't want to re-query the repository.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub execution: Execution,
    pub step_logs: Vec<StepLog>,
    pub planned_orders: Vec<mrp_core::PlannedOrder>,
    pub stock_params: Vec<StockParams>,
    pub capacity_loads: Vec<mrp_core::CapacityLoad>,
    pub storage_projections: Vec<mrp_optimizer::StorageProjection>,
    pub action_messages: Vec<mrp_calc::ActionMessage>,
    pub warnings: Vec<String>,
}

/// Runs the full eight-stage pipeline against `repo`. Refuses to start while
/// another execution is `RUNNING` (invariant 7).
pub fn run_mrp(repo: &dyn MrpRepository, params: &MrpRunParams, now: DateTime<Utc>) -> Result<RunOutcome> {
    if repo.running_execution_count()? > 0 {
        return Err(MrpError::ConcurrencyConflict);
    }

    let execution_id = uuid::Uuid::new_v4().to_string();
    let mut execution = Execution::new(&execution_id, serde_json::json!(params_json(params)));
    execution.start(now);
    repo.save_execution(&execution)?;

    let mut step_logs = Vec::new();
    let mut warnings = Vec::new();

    let start_date = params.effective_start_date(now);
    let week_buckets = weekly_buckets(start_date, params.planning_horizon_weeks as usize);
    let week_starts: Vec<DateTime<Utc>> = week_buckets.iter().map(|b| b.start).collect();

    macro_rules! fail {
        ($step:expr, $err:expr) => {{
            let err = $err;
            let log = StepLog::running(&execution_id, $step, step_order($step))
                .fail(0, Some(serde_json::json!({ "error": err.to_string() })));
            repo.save_step_log(&log)?;
            step_logs.push(log);
            execution.fail(now, serde_json::json!({ "failed_step": $step, "error": err.to_string() }));
            repo.save_execution(&execution)?;
            return Err(err);
        }};
    }

    let products = match repo.active_products() {
        Ok(p) => p,
        Err(e) => fail!("MPS", e),
    };

    // Stage 1: MPS.
    let finished: Vec<Product> = products.iter().filter(|p| p.kind == ProductKind::Finished).cloned().collect();
    let firm_orders = match repo.firm_orders() {
        Ok(o) => o,
        Err(e) => fail!("MPS", e),
    };
    let forecast_points = match repo.latest_completed_forecast_points() {
        Ok(f) => f,
        Err(e) => fail!("MPS", e),
    };
    let mps = compute_mps(
        &finished,
        &firm_orders,
        &forecast_points,
        start_date,
        params.planning_horizon_weeks,
        params.firm_order_horizon_weeks,
    );
    warnings.extend(mps.warnings.clone());
    log_step(repo, &mut step_logs, &execution_id, "MPS", mps.lines.len() as u64, None)?;

    // Stage 2: Stock Parameters (safety stock, ROP, min/max, EOQ).
    let bom_lines = match repo.bom_lines() {
        Ok(b) => b,
        Err(e) => fail!("STOCK_PARAMS", e),
    };
    let mut rng = Mulberry32::new(42);
    let prior_stock_params = match repo.latest_stock_params() {
        Ok(p) => p,
        Err(e) => fail!("STOCK_PARAMS", e),
    };
    let mut stock_params = Vec::new();
    let mut skipped = 0u64;
    for product in &products {
        if !params.force_recalculate {
            if let Some(prior) = prior_stock_params.iter().find(|s| s.product_id == product.id) {
                let mut carried = prior.clone();
                carried.execution_id = execution_id.clone();
                stock_params.push(carried);
                skipped += 1;
                continue;
            }
        }
        let profile = build_demand_profile(product, &mps);
        let (tft_available, tft_quantile_sum, tft_p50_sum) =
            tft_coverage(product, &forecast_points, &week_starts, 0.95);
        let ss_result = select_safety_stock(
            product,
            &profile,
            0.95,
            tft_available,
            tft_quantile_sum,
            tft_p50_sum,
            &mut rng,
            params.monte_carlo_iterations,
        );
        let rop = mrp_calc::reorder_point(&profile, ss_result.safety_stock);
        let annual_demand = profile.mean_demand() * Decimal::from(52);
        let eoq_value = mrp_calc::eoq(annual_demand, product.order_cost, product.unit_cost, product.annual_holding_percent);
        let max_value = mrp_calc::max_level(&profile, ss_result.safety_stock);
        stock_params.push(StockParams::new(
            &execution_id,
            &product.id,
            ss_result.safety_stock,
            rop,
            mrp_calc::min_level(rop),
            max_value,
            eoq_value,
            ss_result.method,
            0.95,
            now,
        ));
    }
    repo.save_stock_params(&stock_params)?;
    log_step(
        repo,
        &mut step_logs,
        &execution_id,
        "STOCK_PARAMS",
        stock_params.len() as u64,
        Some(serde_json::json!({ "skipped": skipped })),
    )?;

    // Stage 3: BOM explosion and netting.
    let arena = build_arena(&bom_lines, &finished);
    let roots = arena.structural_roots();
    let mps_demand = requirements_map(&mps, &week_starts);
    let exploded = match bom_calc::explode(&arena, &roots, &mps_demand) {
        Ok(r) => r,
        Err(e) => fail!("BOM_EXPLODE_NET", MrpError::from(e)),
    };

    let inventory = match repo.inventory_snapshots() {
        Ok(i) => i,
        Err(e) => fail!("BOM_EXPLODE_NET", e),
    };
    let existing_orders = match repo.existing_orders() {
        Ok(o) => o,
        Err(e) => fail!("BOM_EXPLODE_NET", e),
    };

    let mut net_by_product: HashMap<String, Vec<Decimal>> = HashMap::new();
    for product in &products {
        let gross = gross_requirements_for(&exploded, &product.id, &week_starts);
        let scheduled = scheduled_receipts_for(&existing_orders, &product.id, &week_buckets);
        let initial_stock = mrp_core::net_available_stock(&inventory, &product.id);
        let ss = stock_params
            .iter()
            .find(|s| s.product_id == product.id)
            .map(|s| s.safety_stock)
            .unwrap_or(Decimal::ZERO);
        let rows = net_requirements(&gross, &scheduled, initial_stock, ss);
        net_by_product.insert(product.id.clone(), rows.iter().map(|r| r.net_requirement).collect());
    }
    log_step(repo, &mut step_logs, &execution_id, "BOM_EXPLODE_NET", net_by_product.len() as u64, None)?;

    // Stage 4: Lot sizing.
    let mut lot_sized: HashMap<String, Vec<mrp_calc::LotSizeOrder>> = HashMap::new();
    for product in &products {
        let net = net_by_product.get(&product.id).cloned().unwrap_or_default();
        let params_for_product = LotSizingParams {
            eoq: stock_params.iter().find(|s| s.product_id == product.id).map(|s| s.eoq).unwrap_or(Decimal::ZERO),
            minimum_lot: product.minimum_lot,
            purchase_multiple: product.purchase_multiple,
            moq: product.moq,
            order_cost: product.order_cost,
            holding_cost_per_period: product.weekly_holding_cost(),
            lead_time_periods: product.lead_time_periods(),
        };
        match apply_lot_sizing(product.lot_sizing_tag, &net, &params_for_product, week_buckets.len()) {
            Ok(orders) => {
                lot_sized.insert(product.id.clone(), orders);
            }
            Err(e) => fail!("LOT_SIZE", e),
        }
    }
    log_step(repo, &mut step_logs, &execution_id, "LOT_SIZE", lot_sized.len() as u64, None)?;

    // Stage 5: Order generation.
    let mut planned_orders = Vec::new();
    let mut seq = 1u64;
    let mut product_ids: Vec<&String> = lot_sized.keys().collect();
    product_ids.sort();
    for product_id in product_ids {
        let product = products.iter().find(|p| &p.id == product_id).unwrap();
        let orders = &lot_sized[product_id];
        if orders.is_empty() {
            continue;
        }
        let supplier_links = match repo.supplier_links(product_id) {
            Ok(l) => l,
            Err(e) => fail!("ORDER_GENERATE", e),
        };
        let mut suppliers = Vec::new();
        for link in &supplier_links {
            if let Ok(Some(s)) = repo.supplier(&link.supplier_id) {
                suppliers.push(s);
            }
        }
        let routing_steps = match repo.routing_steps(product_id) {
            Ok(r) => r,
            Err(e) => fail!("ORDER_GENERATE", e),
        };
        let work_centers = match repo.work_centers() {
            Ok(w) => w,
            Err(e) => fail!("ORDER_GENERATE", e),
        };
        let (orders, order_warnings) = generate_orders(
            &execution_id,
            seq,
            product,
            orders,
            &week_starts,
            &supplier_links,
            &suppliers,
            &routing_steps,
            &work_centers,
            now,
        );
        seq += orders.len() as u64;
        warnings.extend(order_warnings.into_iter().map(|w| format!("{}: {}", w.product_id, w.message)));
        planned_orders.extend(orders);
    }
    repo.save_orders(&planned_orders)?;
    log_step(repo, &mut step_logs, &execution_id, "ORDER_GENERATE", planned_orders.len() as u64, None)?;

    // Stage 6: Action messages.
    let action_messages = diff_orders(&planned_orders, &existing_orders);
    log_step(repo, &mut step_logs, &execution_id, "ACTION_MESSAGES", action_messages.len() as u64, None)?;

    // Stage 7: Capacity requirements planning.
    let work_centers = match repo.work_centers() {
        Ok(w) => w,
        Err(e) => fail!("CRP", e),
    };
    let calendar_days = match repo.calendar_days() {
        Ok(c) => c,
        Err(e) => fail!("CRP", e),
    };
    let mut capacity_loads = Vec::new();
    for wc in &work_centers {
        let mut all_routing_steps = Vec::new();
        for product in &products {
            if let Ok(steps) = repo.routing_steps(&product.id) {
                all_routing_steps.extend(steps);
            }
        }
        for &week_start in &week_starts {
            let available = available_hours(wc, &calendar_days, week_start);
            let planned = mrp_optimizer::planned_hours(&wc.id, week_start, &planned_orders, &all_routing_steps);
            capacity_loads.push(build_capacity_load(&execution_id, &wc.id, week_start, available, planned));
        }
    }
    repo.save_capacity_loads(&capacity_loads)?;
    log_step(repo, &mut step_logs, &execution_id, "CRP", capacity_loads.len() as u64, None)?;

    // Stage 8: Storage validation.
    let warehouses = match repo.warehouses() {
        Ok(w) => w,
        Err(e) => fail!("STORAGE_VALIDATE", e),
    };
    let deltas = storage_deltas(&warehouses, &inventory, &planned_orders, &net_by_product, &products, &week_starts);
    let mut initial_volume = HashMap::new();
    for wh in &warehouses {
        let vol = inventory
            .iter()
            .filter(|s| s.warehouse_id == wh.id)
            .filter_map(|s| products.iter().find(|p| p.id == s.product_id).map(|p| p.unit_volume_m3 * s.net_available()))
            .sum();
        initial_volume.insert(wh.id.clone(), vol);
    }
    let storage_projections = project_storage(&warehouses, &deltas, &week_starts, &initial_volume);
    log_step(repo, &mut step_logs, &execution_id, "STORAGE_VALIDATE", storage_projections.len() as u64, None)?;

    execution.complete(
        now,
        serde_json::json!({
            "planned_orders": planned_orders.len(),
            "warnings": warnings.len(),
        }),
    );
    repo.save_execution(&execution)?;

    Ok(RunOutcome {
        execution,
        step_logs,
        planned_orders,
        stock_params,
        capacity_loads,
        storage_projections,
        action_messages,
        warnings,
    })
}

fn params_json(params: &MrpRunParams) -> serde_json::Value {
    serde_json::json!({
        "planning_horizon_weeks": params.planning_horizon_weeks,
        "firm_order_horizon_weeks": params.firm_order_horizon_weeks,
        "force_recalculate": params.force_recalculate,
    })
}

fn step_order(step_name: &str) -> u8 {
    mrp_core::STEP_NAMES
        .iter()
        .position(|s| *s == step_name)
        .map(|i| i as u8 + 1)
        .unwrap_or(0)
}

fn log_step(
    repo: &dyn MrpRepository,
    step_logs: &mut Vec<StepLog>,
    execution_id: &str,
    step_name: &'static str,
    records: u64,
    details: Option<serde_json::Value>,
) -> Result<()> {
    let log = StepLog::running(execution_id, step_name, step_order(step_name)).complete(records, 0, details);
    repo.save_step_log(&log)?;
    step_logs.push(log);
    Ok(())
}

/// Sums `ForecastPoint` quantiles for `product` over its lead-time horizon
/// (§4.3 priority 3: "Available TFT forecast quantiles covering the
/// lead-time horizon"). `available` is true iff at least one forecast point
/// for the product falls inside that window; null quantile fields still
/// contribute 0 per `ForecastPoint::quantile_for_service_level`.
fn tft_coverage(
    product: &Product,
    forecast_points: &[mrp_core::ForecastPoint],
    week_starts: &[DateTime<Utc>],
    service_level: f64,
) -> (bool, Decimal, Decimal) {
    let lt_weeks = (product.lead_time_periods() as usize).min(week_starts.len());
    if lt_weeks == 0 {
        return (false, Decimal::ZERO, Decimal::ZERO);
    }

    let mut quantile_sum = Decimal::ZERO;
    let mut p50_sum = Decimal::ZERO;
    let mut available = false;

    for &week_start in &week_starts[..lt_weeks] {
        let week_end = week_start + Duration::days(7);
        for point in forecast_points
            .iter()
            .filter(|p| p.product_id == product.id && p.period_start >= week_start && p.period_start < week_end)
        {
            quantile_sum += point.quantile_for_service_level(service_level);
            p50_sum += point.p50.unwrap_or(Decimal::ZERO);
            available = true;
        }
    }

    (available, quantile_sum, p50_sum)
}

fn build_demand_profile(product: &Product, mps: &mrp_calc::MpsResult) -> DemandProfile {
    let samples = mps
        .lines
        .iter()
        .find(|l| l.product_id == product.id)
        .map(|l| l.mps_demand.clone())
        .unwrap_or_default();
    DemandProfile {
        weekly_demand_samples: samples,
        lead_time_weeks: Decimal::from(product.lead_time_periods()),
        review_weeks: Decimal::from(product.review_interval_days) / Decimal::from(7),
        lead_time_observations_days: Vec::new(),
        lead_time_min_days: None,
        lead_time_max_days: None,
        is_make: product.kind.is_make(),
    }
}

/// Builds the BOM arena from `bom_lines`, then ensures every root-level
/// MPS-demand product (`finished`) has a node even if it never appears in a
/// `BomLine` — otherwise a no-BOM finished product would be absent from
/// `structural_roots()` and lose its MPS pass-through in `explode` (§4.4).
fn build_arena(bom_lines: &[mrp_core::BomLine], finished: &[Product]) -> Arena {
    let mut arena = Arena::new();
    let mut ensure = |arena: &mut Arena, id: &str| -> bom_graph::NodeIndex {
        arena.find_node(id).unwrap_or_else(|| arena.add_node(id))
    };
    for line in bom_lines {
        let parent = ensure(&mut arena, &line.parent_product_id);
        let child = ensure(&mut arena, &line.child_product_id);
        arena.add_edge(parent, child, BomEdge::new(line.quantity_per_parent, line.loss_percent));
    }
    for product in finished {
        ensure(&mut arena, &product.id);
    }
    arena
}

fn requirements_map(mps: &mrp_calc::MpsResult, week_starts: &[DateTime<Utc>]) -> bom_calc::RequirementsMap {
    let mut map = bom_calc::RequirementsMap::new();
    for line in &mps.lines {
        let mut periods = BTreeMap::new();
        for (i, &week) in week_starts.iter().enumerate() {
            if let Some(&qty) = line.mps_demand.get(i) {
                periods.insert(week, qty);
            }
        }
        map.insert(line.product_id.clone(), periods);
    }
    map
}

fn gross_requirements_for(exploded: &bom_calc::RequirementsMap, product_id: &str, week_starts: &[DateTime<Utc>]) -> Vec<Decimal> {
    let Some(periods) = exploded.get(product_id) else {
        return vec![Decimal::ZERO; week_starts.len()];
    };
    week_starts.iter().map(|w| periods.get(w).copied().unwrap_or(Decimal::ZERO)).collect()
}

fn scheduled_receipts_for(orders: &[mrp_core::PlannedOrder], product_id: &str, buckets: &[mrp_core::WeekBucket]) -> Vec<Decimal> {
    buckets
        .iter()
        .map(|bucket| {
            orders
                .iter()
                .filter(|o| {
                    o.product_id == product_id
                        && matches!(o.status, OrderStatus::Firm | OrderStatus::Released)
                        && mrp_core::in_bucket(o.expected_receipt, bucket)
                })
                .map(|o| o.quantity)
                .sum()
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn storage_deltas(
    warehouses: &[mrp_core::Warehouse],
    inventory: &[mrp_core::InventorySnapshot],
    planned_orders: &[mrp_core::PlannedOrder],
    net_by_product: &HashMap<String, Vec<Decimal>>,
    products: &[Product],
    week_starts: &[DateTime<Utc>],
) -> Vec<VolumeDelta> {
    let mut deltas = Vec::new();
    for wh in warehouses {
        let resident_products: Vec<&String> = inventory
            .iter()
            .filter(|s| s.warehouse_id == wh.id)
            .map(|s| &s.product_id)
            .collect();

        for product_id in resident_products {
            let Some(product) = products.iter().find(|p| &p.id == product_id) else {
                continue;
            };
            let net = net_by_product.get(product_id);

            for (week_index, &week_start) in week_starts.iter().enumerate() {
                let incoming: Decimal = planned_orders
                    .iter()
                    .filter(|o| &o.product_id == product_id && o.needed_by == week_start)
                    .map(|o| o.quantity)
                    .sum();
                let outgoing = net.and_then(|n| n.get(week_index)).copied().unwrap_or(Decimal::ZERO);
                let delta = round4((incoming - outgoing) * product.unit_volume_m3);
                if !delta.is_zero() {
                    deltas.push(VolumeDelta { warehouse_id: wh.id.clone(), week_index, delta_m3: delta });
                }
            }
        }
    }
    deltas
}
