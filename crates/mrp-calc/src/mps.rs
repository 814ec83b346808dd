//! Master Production Schedule (§4.2): level-0 demand for finished products.

use chrono::{DateTime, Utc};
use mrp_core::{round4, weekly_buckets, ForecastPoint, OrderKind, OrderStatus, PlannedOrder, Product, WeekBucket};
use rust_decimal::Decimal;

/// Per-product weekly demand buckets produced by the MPS stage.
#[derive(Debug, Clone)]
pub struct MpsLine {
    pub product_id: String,
    pub buckets: Vec<WeekBucket>,
    pub mps_demand: Vec<Decimal>,
    pub had_forecast: bool,
}

/// Output of the whole MPS stage.
#[derive(Debug, Clone)]
pub struct MpsResult {
    pub lines: Vec<MpsLine>,
    pub warnings: Vec<String>,
}

/// `mpsDemand[i] = i < firmOrderHorizonWeeks ? max(forecast, firmOrder) :
/// forecast` for each active FINISHED product and weekly bucket (§4.2).
pub fn compute_mps(
    finished_products: &[Product],
    firm_orders: &[PlannedOrder],
    forecast_points: &[ForecastPoint],
    start_date: DateTime<Utc>,
    planning_horizon_weeks: u32,
    firm_order_horizon_weeks: u32,
) -> MpsResult {
    let buckets = weekly_buckets(start_date, planning_horizon_weeks as usize);
    let mut lines = Vec::with_capacity(finished_products.len());
    let mut warnings = Vec::new();

    for product in finished_products {
        let mut demand = Vec::with_capacity(buckets.len());
        let mut had_forecast = false;

        let product_forecasts: Vec<&ForecastPoint> =
            forecast_points.iter().filter(|f| f.product_id == product.id).collect();
        if !product_forecasts.is_empty() {
            had_forecast = true;
        }

        let product_firm_orders: Vec<&PlannedOrder> = firm_orders
            .iter()
            .filter(|o| {
                o.product_id == product.id && o.status == OrderStatus::Firm && o.kind == OrderKind::Make
            })
            .collect();

        for (i, bucket) in buckets.iter().enumerate() {
            let forecast_demand: Decimal = product_forecasts
                .iter()
                .filter(|f| f.period_start >= bucket.start && f.period_start <= bucket.end)
                .filter_map(|f| f.p50)
                .sum();

            let firm_order_demand: Decimal = product_firm_orders
                .iter()
                .filter(|o| o.needed_by >= bucket.start && o.needed_by <= bucket.end)
                .map(|o| o.quantity)
                .sum();

            let mps = if (i as u32) < firm_order_horizon_weeks {
                forecast_demand.max(firm_order_demand)
            } else {
                forecast_demand
            };

            demand.push(round4(mps));
        }

        if !had_forecast {
            warnings.push(format!("no forecast available for product {}", product.id));
        }

        lines.push(MpsLine {
            product_id: product.id.clone(),
            buckets: buckets.clone(),
            mps_demand: demand,
            had_forecast,
        });
    }

    MpsResult { lines, warnings }
}
