//! End-to-end pipeline tests against an in-memory repository.

use chrono::{TimeZone, Utc};
use mrp::run_mrp;
use mrp_core::{
    BomLine, ExecutionStatus, ForecastPoint, InMemoryRepository, LotSizingTag, MrpRepository,
    MrpRunParams, OrderKind, Product, ProductKind, RoutingStep, Supplier, SupplierLink, WorkCenter,
};
use rust_decimal::Decimal;

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
}

#[test]
fn single_level_bom_produces_buy_and_make_orders() {
    let repo = InMemoryRepository::new();

    repo.add_product(Product::new("A", "A", ProductKind::Finished).with_lot_sizing_tag(LotSizingTag::LotForLot));
    repo.add_product(
        Product::new("B", "B", ProductKind::Raw)
            .with_lot_sizing_tag(LotSizingTag::LotForLot)
            .with_minimum_lot(Decimal::from(10)),
    );
    repo.add_bom_line(BomLine::new("A", "B", Decimal::from(2)));
    repo.add_supplier(Supplier {
        id: "S1".into(),
        name: "Supplier".into(),
        default_lead_time_days: Some(3),
        min_lead_time_days: None,
        max_lead_time_days: None,
    });
    repo.add_supplier_link(SupplierLink::new("B", "S1").with_unit_price(Decimal::from(2)).as_principal());
    repo.add_forecast_point(ForecastPoint::new("SEED", "A", start()).with_p50(Decimal::from(100)));

    let params = MrpRunParams::default().with_planning_horizon_weeks(4);
    let outcome = run_mrp(&repo, &params, start()).unwrap();

    assert_eq!(outcome.execution.status, ExecutionStatus::Completed);

    let a_orders: Vec<_> = outcome.planned_orders.iter().filter(|o| o.product_id == "A").collect();
    assert_eq!(a_orders.len(), 1);
    assert_eq!(a_orders[0].kind, OrderKind::Make);
    assert_eq!(a_orders[0].quantity, Decimal::from(100));

    let b_orders: Vec<_> = outcome.planned_orders.iter().filter(|o| o.product_id == "B").collect();
    assert!(!b_orders.is_empty());
    assert_eq!(b_orders[0].kind, OrderKind::Buy);
    let total_b: Decimal = b_orders.iter().map(|o| o.quantity).sum();
    assert_eq!(total_b, Decimal::from(200));
}

#[test]
fn multi_level_bom_propagates_requirements_through_levels() {
    let repo = InMemoryRepository::new();

    repo.add_product(Product::new("BIKE", "BIKE", ProductKind::Finished));
    repo.add_product(Product::new("FRAME", "FRAME", ProductKind::SemiFinished));
    repo.add_product(Product::new("STEEL-TUBE", "STEEL-TUBE", ProductKind::Raw).with_minimum_lot(Decimal::ZERO));
    repo.add_product(Product::new("WHEEL", "WHEEL", ProductKind::Raw));

    repo.add_bom_line(BomLine::new("BIKE", "FRAME", Decimal::from(1)));
    repo.add_bom_line(BomLine::new("BIKE", "WHEEL", Decimal::from(2)));
    repo.add_bom_line(BomLine::new("FRAME", "STEEL-TUBE", Decimal::from(3)));

    repo.add_forecast_point(ForecastPoint::new("SEED", "BIKE", start()).with_p50(Decimal::from(50)));

    let params = MrpRunParams::default().with_planning_horizon_weeks(4);
    let outcome = run_mrp(&repo, &params, start()).unwrap();

    let tube_orders: Vec<_> = outcome.planned_orders.iter().filter(|o| o.product_id == "STEEL-TUBE").collect();
    let total_tube: Decimal = tube_orders.iter().map(|o| o.quantity).sum();
    // BIKE 50 -> FRAME 50 -> STEEL-TUBE 150
    assert_eq!(total_tube, Decimal::from(150));
}

#[test]
fn capacity_overload_is_flagged_and_suggested() {
    let repo = InMemoryRepository::new();
    repo.add_product(
        Product::new("GADGET", "GADGET", ProductKind::Finished).with_production_lead_time_days(0),
    );
    repo.add_routing_step(RoutingStep::new("GADGET", "WC1", 10).with_per_unit_minutes(Decimal::from(600)));
    repo.add_work_center(WorkCenter::new("WC1", "WC1").with_cost_per_hour(Decimal::from(50)));
    repo.add_forecast_point(ForecastPoint::new("SEED", "GADGET", start()).with_p50(Decimal::from(100)));

    let params = MrpRunParams::default().with_planning_horizon_weeks(2);
    let outcome = run_mrp(&repo, &params, start()).unwrap();

    // No calendar days were configured, so available hours are 0 but planned
    // hours are non-zero wherever a GADGET order lands.
    let overloaded = outcome.capacity_loads.iter().any(|c| c.overloaded);
    assert!(overloaded);
}

#[test]
fn concurrent_execution_is_refused() {
    let repo = InMemoryRepository::new();
    let mut running = mrp_core::Execution::new("existing", serde_json::json!({}));
    running.start(start());
    repo.save_execution(&running).unwrap();

    let params = MrpRunParams::default();
    let err = run_mrp(&repo, &params, start()).unwrap_err();
    assert!(matches!(err, mrp_core::MrpError::ConcurrencyConflict));
}

#[test]
fn missing_forecast_is_reported_as_a_warning() {
    let repo = InMemoryRepository::new();
    repo.add_product(Product::new("NOFORECAST", "NOFORECAST", ProductKind::Finished));

    let params = MrpRunParams::default().with_planning_horizon_weeks(2);
    let outcome = run_mrp(&repo, &params, start()).unwrap();

    assert!(outcome.warnings.iter().any(|w| w.contains("NOFORECAST")));
}
