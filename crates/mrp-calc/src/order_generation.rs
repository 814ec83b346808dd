//! Order generation (§4.7): turns lot-sized receipts into enriched,
//! persistable `PlannedOrder`s.

use chrono::{DateTime, Duration, Utc};
use mrp_core::{
    lowest_sequence_step, round4, select_supplier_link, OrderKind, PlannedOrder, Priority, Product,
    ProductKind, RoutingStep, Supplier, SupplierLink, WorkCenter,
};
use rust_decimal::Decimal;

use crate::lot_sizing::LotSizeOrder;

#[derive(Debug, Clone)]
pub struct OrderGenerationWarning {
    pub product_id: String,
    pub message: String,
}

/// Builds one enriched `PlannedOrder` per lot-sized receipt, plus any
/// enrichment warnings (missing price, missing routing cost, unknown kind).
#[allow(clippy::too_many_arguments)]
pub fn generate_orders(
    execution_id: &str,
    order_seq_start: u64,
    product: &Product,
    orders: &[LotSizeOrder],
    week_buckets: &[DateTime<Utc>],
    supplier_links: &[SupplierLink],
    suppliers: &[Supplier],
    routing_steps: &[RoutingStep],
    work_centers: &[WorkCenter],
    reference_date: DateTime<Utc>,
) -> (Vec<PlannedOrder>, Vec<OrderGenerationWarning>) {
    let mut planned = Vec::new();
    let mut warnings = Vec::new();

    let kind = match product.kind {
        ProductKind::Raw | ProductKind::Consumable | ProductKind::Packaging | ProductKind::Resale => {
            Some(OrderKind::Buy)
        }
        ProductKind::Finished | ProductKind::SemiFinished => Some(OrderKind::Make),
    };

    let Some(kind) = kind else {
        warnings.push(OrderGenerationWarning {
            product_id: product.id.clone(),
            message: "UNKNOWN_PRODUCT_KIND".to_string(),
        });
        return (planned, warnings);
    };

    for (i, order) in orders.iter().enumerate() {
        let needed_by = week_buckets
            .get(order.receipt_index)
            .copied()
            .unwrap_or(reference_date);

        let id = format!("{}-{}", execution_id, order_seq_start + i as u64);

        let built = match kind {
            OrderKind::Buy => build_buy_order(
                &id,
                execution_id,
                product,
                order.quantity,
                needed_by,
                supplier_links,
                suppliers,
                &mut warnings,
            ),
            OrderKind::Make => build_make_order(
                &id,
                execution_id,
                product,
                order.quantity,
                needed_by,
                routing_steps,
                work_centers,
                &mut warnings,
            ),
        };

        let priority = classify_priority(built.release_date, reference_date);
        planned.push(built.with_priority(priority));
    }

    (planned, warnings)
}

fn build_buy_order(
    id: &str,
    execution_id: &str,
    product: &Product,
    quantity: Decimal,
    needed_by: DateTime<Utc>,
    supplier_links: &[SupplierLink],
    suppliers: &[Supplier],
    warnings: &mut Vec<OrderGenerationWarning>,
) -> PlannedOrder {
    let chosen = select_supplier_link(supplier_links);
    let supplier = chosen.and_then(|link| suppliers.iter().find(|s| s.id == link.supplier_id));
    let lead_time_days = chosen.map(|l| l.effective_lead_time_days(supplier)).unwrap_or(0);

    let mut order = PlannedOrder::new(id, execution_id, &product.id, OrderKind::Buy, quantity, needed_by, lead_time_days);

    match chosen.and_then(|l| l.unit_price) {
        Some(price) => {
            order = order.with_estimated_cost(round4(quantity * price));
        }
        None => {
            warnings.push(OrderGenerationWarning {
                product_id: product.id.clone(),
                message: "missing unit price for BUY order cost".to_string(),
            });
        }
    }

    if let Some(link) = chosen {
        order = order.with_supplier_id(link.supplier_id.clone());
    }

    order
}

fn build_make_order(
    id: &str,
    execution_id: &str,
    product: &Product,
    quantity: Decimal,
    needed_by: DateTime<Utc>,
    routing_steps: &[RoutingStep],
    work_centers: &[WorkCenter],
    warnings: &mut Vec<OrderGenerationWarning>,
) -> PlannedOrder {
    let lead_time_days = product.production_lead_time_days;
    let mut order = PlannedOrder::new(id, execution_id, &product.id, OrderKind::Make, quantity, needed_by, lead_time_days);

    let mut steps: Vec<&RoutingStep> = routing_steps.iter().filter(|s| s.product_id == product.id).collect();
    steps.sort_by_key(|s| s.sequence);

    if steps.is_empty() {
        warnings.push(OrderGenerationWarning {
            product_id: product.id.clone(),
            message: "missing routing for MAKE order".to_string(),
        });
    }

    if let Some(first) = lowest_sequence_step(routing_steps, &product.id) {
        order = order.with_work_center_id(first.work_center_id.clone());
    }

    let mut total_cost = Decimal::ZERO;
    let mut any_cost = false;
    for step in &steps {
        let Some(wc) = work_centers.iter().find(|w| w.id == step.work_center_id) else {
            warnings.push(OrderGenerationWarning {
                product_id: product.id.clone(),
                message: format!("missing work center {} for routing cost", step.work_center_id),
            });
            continue;
        };
        let Some(cost_per_hour) = wc.cost_per_hour() else {
            warnings.push(OrderGenerationWarning {
                product_id: product.id.clone(),
                message: format!("missing cost per hour for work center {}", wc.id),
            });
            continue;
        };
        let hours = (step.minutes_for(quantity) / Decimal::from(60)).round_dp(4);
        total_cost += hours * cost_per_hour;
        any_cost = true;
    }

    if any_cost {
        order = order.with_estimated_cost(round4(total_cost));
    } else if !steps.is_empty() {
        warnings.push(OrderGenerationWarning {
            product_id: product.id.clone(),
            message: "no routable cost computed for MAKE order".to_string(),
        });
    }

    order
}

/// Priority by release-date distance from the reference date (§4.7).
pub fn classify_priority(release_date: DateTime<Utc>, reference_date: DateTime<Utc>) -> Priority {
    if release_date < reference_date {
        Priority::Critical
    } else if release_date < reference_date + Duration::days(7) {
        Priority::High
    } else if release_date < reference_date + Duration::days(14) {
        Priority::Medium
    } else {
        Priority::Low
    }
}
