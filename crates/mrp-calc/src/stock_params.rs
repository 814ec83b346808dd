//! Stock parameters (§4.3): safety stock, reorder point, min/max, and EOQ.

use mrp_core::{round2, round4, z_for_service_level, Mulberry32, Product, SafetyStockMethod};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Weekly demand history plus lead-time variability inputs for one product.
#[derive(Debug, Clone)]
pub struct DemandProfile {
    pub weekly_demand_samples: Vec<Decimal>,
    pub lead_time_weeks: Decimal,
    pub review_weeks: Decimal,
    pub lead_time_observations_days: Vec<Decimal>,
    pub lead_time_min_days: Option<Decimal>,
    pub lead_time_max_days: Option<Decimal>,
    pub is_make: bool,
}

impl DemandProfile {
    pub fn mean_demand(&self) -> Decimal {
        if self.weekly_demand_samples.is_empty() {
            return Decimal::ZERO;
        }
        self.weekly_demand_samples.iter().sum::<Decimal>() / Decimal::from(self.weekly_demand_samples.len())
    }

    pub fn stddev_demand(&self) -> Decimal {
        stddev(&self.weekly_demand_samples)
    }

    /// σ_LT: empirical from ≥5 observations, else range/6, else 0. MAKE
    /// products always have σ_LT = 0 (§4.3).
    pub fn lead_time_stddev_days(&self) -> Decimal {
        if self.is_make {
            return Decimal::ZERO;
        }
        if self.lead_time_observations_days.len() >= 5 {
            return stddev(&self.lead_time_observations_days);
        }
        match (self.lead_time_min_days, self.lead_time_max_days) {
            (Some(min), Some(max)) => (max - min) / Decimal::from(6),
            _ => Decimal::ZERO,
        }
    }
}

fn stddev(samples: &[Decimal]) -> Decimal {
    if samples.len() < 2 {
        return Decimal::ZERO;
    }
    let mean = samples.iter().sum::<Decimal>() / Decimal::from(samples.len());
    let variance = samples.iter().map(|x| (*x - mean) * (*x - mean)).sum::<Decimal>() / Decimal::from(samples.len());
    decimal_sqrt(variance)
}

fn decimal_sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    Decimal::from_f64_retain(value.to_f64().unwrap_or(0.0).sqrt()).unwrap_or(Decimal::ZERO)
}

/// Extra histogram/CI output only the Monte Carlo method produces (§4.3).
#[derive(Debug, Clone)]
pub struct MonteCarloDetail {
    pub mean_total_demand: Decimal,
    pub service_level_quantile: Decimal,
    pub p5: Decimal,
    pub p95: Decimal,
    pub histogram: Vec<u32>,
}

/// Computed safety stock plus the method that produced it.
#[derive(Debug, Clone)]
pub struct SafetyStockResult {
    pub safety_stock: Decimal,
    pub method: SafetyStockMethod,
    pub monte_carlo: Option<MonteCarloDetail>,
}

/// Method-selection priority (§4.3): manual override, then ABC-A with ≥12
/// samples, then TFT coverage, else classical.
pub fn select_safety_stock(
    product: &Product,
    profile: &DemandProfile,
    service_level: f64,
    tft_quantiles_available: bool,
    tft_quantile_sum: Decimal,
    tft_p50_sum: Decimal,
    rng: &mut Mulberry32,
    monte_carlo_iterations: u32,
) -> SafetyStockResult {
    if let Some(manual) = product.manual_safety_stock {
        return SafetyStockResult {
            safety_stock: manual,
            method: SafetyStockMethod::Classical,
            monte_carlo: None,
        };
    }

    if product.abc_class == Some('A') && profile.weekly_demand_samples.len() >= 12 {
        return monte_carlo_safety_stock(profile, service_level, rng, monte_carlo_iterations);
    }

    if tft_quantiles_available {
        let ss = (tft_quantile_sum - tft_p50_sum).max(Decimal::ZERO);
        return SafetyStockResult {
            safety_stock: round4(ss),
            method: SafetyStockMethod::TftQuantile,
            monte_carlo: None,
        };
    }

    SafetyStockResult {
        safety_stock: round4(classical_safety_stock(profile, service_level)),
        method: SafetyStockMethod::Classical,
        monte_carlo: None,
    }
}

/// `SS = Z·√(LT·σ_d² + d̄²·σ_LT²)` (§4.3).
pub fn classical_safety_stock(profile: &DemandProfile, service_level: f64) -> Decimal {
    let z = Decimal::from_f64_retain(z_for_service_level(service_level)).unwrap_or(Decimal::ZERO);
    let lt = profile.lead_time_weeks;
    let sigma_d = profile.stddev_demand();
    let mean_d = profile.mean_demand();
    let sigma_lt_weeks = profile.lead_time_stddev_days() / Decimal::from(7);

    let variance = lt * sigma_d * sigma_d + mean_d * mean_d * sigma_lt_weeks * sigma_lt_weeks;
    z * decimal_sqrt(variance)
}

/// Monte Carlo safety stock (§4.3): N iterations sampling lead time from
/// Normal(LT_days, σ_LT_days) clamped to ≥1, and daily demand by resampling
/// the empirical weekly/7 series with replacement.
pub fn monte_carlo_safety_stock(
    profile: &DemandProfile,
    service_level: f64,
    rng: &mut Mulberry32,
    iterations: u32,
) -> SafetyStockResult {
    let lt_days_mean = (profile.lead_time_weeks * Decimal::from(7)).to_f64().unwrap_or(0.0);
    let lt_days_sigma = profile.lead_time_stddev_days().to_f64().unwrap_or(0.0);
    let daily_samples: Vec<f64> = profile
        .weekly_demand_samples
        .iter()
        .map(|w| (*w / Decimal::from(7)).to_f64().unwrap_or(0.0))
        .collect();

    let mut totals: Vec<f64> = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        let lt_days = rng.next_normal(lt_days_mean, lt_days_sigma).max(1.0);
        let sampled_days = lt_days.round().max(1.0) as usize;

        let mut total = 0.0;
        for _ in 0..sampled_days {
            let idx = rng.next_index(daily_samples.len().max(1));
            total += daily_samples.get(idx).copied().unwrap_or(0.0);
        }
        totals.push(total);
    }

    totals.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mean_total = mrp_core::rng::mean(&totals);
    let quantile = mrp_core::rng::quantile_sorted(&totals, service_level);
    let ss = (quantile - mean_total).max(0.0);

    let p5 = mrp_core::rng::quantile_sorted(&totals, 0.05);
    let p95 = mrp_core::rng::quantile_sorted(&totals, 0.95);
    let histogram = build_histogram(&totals, 20);

    SafetyStockResult {
        safety_stock: round4(Decimal::from_f64_retain(ss).unwrap_or(Decimal::ZERO)),
        method: SafetyStockMethod::MonteCarlo,
        monte_carlo: Some(MonteCarloDetail {
            mean_total_demand: round4(Decimal::from_f64_retain(mean_total).unwrap_or(Decimal::ZERO)),
            service_level_quantile: round4(Decimal::from_f64_retain(quantile).unwrap_or(Decimal::ZERO)),
            p5: round4(Decimal::from_f64_retain(p5).unwrap_or(Decimal::ZERO)),
            p95: round4(Decimal::from_f64_retain(p95).unwrap_or(Decimal::ZERO)),
            histogram,
        }),
    }
}

fn build_histogram(sorted_totals: &[f64], buckets: usize) -> Vec<u32> {
    if sorted_totals.is_empty() {
        return vec![0; buckets];
    }
    let min = sorted_totals[0];
    let max = sorted_totals[sorted_totals.len() - 1];
    let range = max - min;
    let mut counts = vec![0u32; buckets];
    if range <= 0.0 {
        counts[0] = sorted_totals.len() as u32;
        return counts;
    }
    let width = range / buckets as f64;
    for &v in sorted_totals {
        let mut bucket = ((v - min) / width) as usize;
        if bucket >= buckets {
            bucket = buckets - 1;
        }
        counts[bucket] += 1;
    }
    counts
}

/// ROP = `d̄·LT + SS`.
pub fn reorder_point(profile: &DemandProfile, safety_stock: Decimal) -> Decimal {
    round4(profile.mean_demand() * profile.lead_time_weeks + safety_stock)
}

/// EOQ = `√(2·D_annual·K/h)`; 0 if any input ≤0.
pub fn eoq(annual_demand: Decimal, order_cost: Decimal, unit_cost: Decimal, annual_holding_percent: Decimal) -> Decimal {
    let h = unit_cost * annual_holding_percent / Decimal::from(100);
    if annual_demand <= Decimal::ZERO || order_cost <= Decimal::ZERO || h <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round4(decimal_sqrt(Decimal::from(2) * annual_demand * order_cost / h))
}

/// Min = ROP; Max = `d̄·(LT+R) + SS`.
pub fn min_level(reorder_point: Decimal) -> Decimal {
    reorder_point
}

pub fn max_level(profile: &DemandProfile, safety_stock: Decimal) -> Decimal {
    round4(profile.mean_demand() * (profile.lead_time_weeks + profile.review_weeks) + safety_stock)
}

use rust_decimal::prelude::FromPrimitive;

#[cfg(test)]
mod tests {
    use super::*;
    use mrp_core::ProductKind;

    fn profile() -> DemandProfile {
        DemandProfile {
            weekly_demand_samples: vec![Decimal::from(100); 10],
            lead_time_weeks: Decimal::from(2),
            review_weeks: Decimal::from(1),
            lead_time_observations_days: vec![],
            lead_time_min_days: Some(Decimal::from(10)),
            lead_time_max_days: Some(Decimal::from(16)),
            is_make: false,
        }
    }

    #[test]
    fn manual_override_wins() {
        let product = Product::new("P", "P", ProductKind::Raw).with_manual_safety_stock(Decimal::from(42));
        let mut rng = Mulberry32::new(1);
        let result = select_safety_stock(&product, &profile(), 0.95, false, Decimal::ZERO, Decimal::ZERO, &mut rng, 100);
        assert_eq!(result.safety_stock, Decimal::from(42));
        assert_eq!(result.method, SafetyStockMethod::Classical);
    }

    #[test]
    fn classical_used_when_no_override_or_tft() {
        let product = Product::new("P", "P", ProductKind::Raw);
        let mut rng = Mulberry32::new(1);
        let result = select_safety_stock(&product, &profile(), 0.95, false, Decimal::ZERO, Decimal::ZERO, &mut rng, 100);
        assert_eq!(result.method, SafetyStockMethod::Classical);
        assert!(result.safety_stock >= Decimal::ZERO);
    }

    #[test]
    fn tft_used_when_available_and_not_abc_a() {
        let product = Product::new("P", "P", ProductKind::Raw);
        let mut rng = Mulberry32::new(1);
        let result = select_safety_stock(
            &product,
            &profile(),
            0.95,
            true,
            Decimal::from(500),
            Decimal::from(300),
            &mut rng,
            100,
        );
        assert_eq!(result.method, SafetyStockMethod::TftQuantile);
        assert_eq!(result.safety_stock, Decimal::from(200));
    }

    #[test]
    fn monte_carlo_used_for_abc_a_with_enough_samples() {
        let product = Product::new("P", "P", ProductKind::Raw).with_abc_class('A');
        let mut rng = Mulberry32::new(7);
        let result = select_safety_stock(&product, &profile(), 0.95, true, Decimal::from(500), Decimal::from(300), &mut rng, 1000);
        assert_eq!(result.method, SafetyStockMethod::MonteCarlo);
        assert!(result.monte_carlo.is_some());
    }

    #[test]
    fn eoq_is_zero_when_inputs_nonpositive() {
        assert_eq!(eoq(Decimal::ZERO, Decimal::from(10), Decimal::from(5), Decimal::from(20)), Decimal::ZERO);
        assert_eq!(eoq(Decimal::from(100), Decimal::ZERO, Decimal::from(5), Decimal::from(20)), Decimal::ZERO);
    }

    #[test]
    fn eoq_matches_wilson_formula() {
        // D=1000, K=50, h=unitCost*pct/100=5*20/100=1 -> sqrt(2*1000*50/1)=316.22...
        let result = eoq(Decimal::from(1000), Decimal::from(50), Decimal::from(5), Decimal::from(20));
        assert!(result > Decimal::from(316) && result < Decimal::from(317));
    }

    #[test]
    fn make_products_have_zero_lead_time_variance() {
        let mut p = profile();
        p.is_make = true;
        assert_eq!(p.lead_time_stddev_days(), Decimal::ZERO);
    }
}
