//! Runs the planning pipeline once against a small in-memory bicycle BOM:
//! one finished bike made from a frame and a wheel, the wheel bought from a
//! principal supplier.

use chrono::{TimeZone, Utc};
use mrp::run_mrp;
use mrp_core::{
    BomLine, ExecutionStatus, ForecastPoint, InMemoryRepository, LotSizingTag, MrpRunParams,
    Product, ProductKind, RoutingStep, Supplier, SupplierLink, WorkCenter,
};
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let repo = InMemoryRepository::new();

    repo.add_product(
        Product::new("BIKE-001", "BIKE-001", ProductKind::Finished)
            .with_lot_sizing_tag(LotSizingTag::LotForLot)
            .with_production_lead_time_days(7),
    );
    repo.add_product(
        Product::new("FRAME-001", "FRAME-001", ProductKind::SemiFinished)
            .with_lot_sizing_tag(LotSizingTag::LotForLot)
            .with_production_lead_time_days(5),
    );
    repo.add_product(
        Product::new("WHEEL-001", "WHEEL-001", ProductKind::Raw)
            .with_lot_sizing_tag(LotSizingTag::Eoq)
            .with_minimum_lot(Decimal::from(50)),
    );

    repo.add_bom_line(BomLine::new("BIKE-001", "FRAME-001", Decimal::from(1)));
    repo.add_bom_line(BomLine::new("BIKE-001", "WHEEL-001", Decimal::from(2)));

    repo.add_routing_step(RoutingStep::new("BIKE-001", "WC-ASSEMBLY", 10).with_per_unit_minutes(Decimal::from(30)));
    repo.add_routing_step(RoutingStep::new("FRAME-001", "WC-WELD", 10).with_per_unit_minutes(Decimal::from(20)));
    repo.add_work_center(WorkCenter::new("WC-ASSEMBLY", "WC-ASSEMBLY").with_cost_per_hour(Decimal::from(40)));
    repo.add_work_center(WorkCenter::new("WC-WELD", "WC-WELD").with_cost_per_hour(Decimal::from(55)));

    repo.add_supplier(Supplier {
        id: "SUP-1".into(),
        name: "Acme Wheels".into(),
        default_lead_time_days: Some(10),
        min_lead_time_days: None,
        max_lead_time_days: None,
    });
    repo.add_supplier_link(
        SupplierLink::new("WHEEL-001", "SUP-1")
            .with_unit_price(Decimal::from(12))
            .as_principal(),
    );

    let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
    repo.add_forecast_point(ForecastPoint::new("SEED", "BIKE-001", start).with_p50(Decimal::from(40)));

    let params = MrpRunParams::default().with_planning_horizon_weeks(8);
    let outcome = run_mrp(&repo, &params, start)?;

    println!("execution {} -> {:?}", outcome.execution.id, outcome.execution.status);
    for warning in &outcome.warnings {
        println!("warning: {warning}");
    }
    for order in &outcome.planned_orders {
        println!(
            "{:?} order for {} x{} needed by {} (priority {:?})",
            order.kind, order.product_id, order.quantity, order.needed_by, order.priority
        );
    }
    for load in &outcome.capacity_loads {
        if load.overloaded {
            println!(
                "work center {} overloaded in week {}: {}h planned vs {}h available",
                load.work_center_id, load.week_start, load.planned_hours, load.available_hours
            );
        }
    }

    assert_eq!(outcome.execution.status, ExecutionStatus::Completed);

    Ok(())
}
