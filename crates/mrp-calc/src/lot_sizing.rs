//! Lot sizing (§4.6): turns net requirements into planned order receipts
//! under minimum-lot, purchase-multiple, MOQ, and lead-time constraints.

use mrp_core::{LotSizingTag, MrpError, Result};
use rust_decimal::Decimal;

/// A single planned receipt before lead-time offsetting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotSizeReceipt {
    pub period_index: usize,
    pub quantity: Decimal,
}

/// Parameters governing one product's lot-sizing run (§4.6, §4.11).
#[derive(Debug, Clone)]
pub struct LotSizingParams {
    pub eoq: Decimal,
    pub minimum_lot: Decimal,
    pub purchase_multiple: Decimal,
    pub moq: Decimal,
    pub order_cost: Decimal,
    pub holding_cost_per_period: Decimal,
    pub lead_time_periods: u32,
}

/// A receipt offset back to its release period, per §4.6's lead-time rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotSizeOrder {
    pub receipt_index: usize,
    pub release_index: Option<usize>,
    pub past_due: bool,
    pub quantity: Decimal,
}

/// Routes to the method named by `tag`, applies order constraints, and
/// offsets receipts into releases. Unsupported tags are rejected upstream by
/// `LotSizingTag` being an exhaustive enum; a textual tag that doesn't parse
/// into one surfaces as `BAD_METHOD` at the call site.
pub fn apply_lot_sizing(
    tag: LotSizingTag,
    net_requirements: &[Decimal],
    params: &LotSizingParams,
    horizon_len: usize,
) -> Result<Vec<LotSizeOrder>> {
    let receipts = match tag {
        LotSizingTag::LotForLot => lot_for_lot(net_requirements, params),
        LotSizingTag::Eoq => eoq_with_coverage(net_requirements, params),
        LotSizingTag::SilverMeal => silver_meal(net_requirements, params),
        LotSizingTag::WagnerWhitin => wagner_whitin(net_requirements, params),
    };
    Ok(offset_lead_time(&receipts, params.lead_time_periods, horizon_len))
}

/// Unsupported/unrecognized lot-sizing tag strings route here (§4.6
/// `BAD_METHOD`). `LotSizingTag` itself is exhaustive, so this only fires
/// when a caller is parsing a method tag sourced outside the type system.
pub fn bad_method(tag: &str) -> MrpError {
    MrpError::BadMethod(tag.to_string())
}

fn apply_constraints(quantity: Decimal, params: &LotSizingParams) -> Decimal {
    let mut q = quantity;
    if q > Decimal::ZERO && q < params.minimum_lot {
        q = params.minimum_lot;
    }
    if params.purchase_multiple > Decimal::ONE {
        q = (q / params.purchase_multiple).ceil() * params.purchase_multiple;
    }
    if q < params.moq {
        q = params.moq;
    }
    q
}

fn lot_for_lot(net_requirements: &[Decimal], params: &LotSizingParams) -> Vec<LotSizeReceipt> {
    net_requirements
        .iter()
        .enumerate()
        .filter(|(_, &q)| q > Decimal::ZERO)
        .map(|(t, &q)| LotSizeReceipt {
            period_index: t,
            quantity: apply_constraints(q, params),
        })
        .collect()
}

/// EOQ with coverage carry-forward. The coverage ledger is updated with the
/// post-constraint order quantity, not the raw `max(EOQ, deficit)` amount.
fn eoq_with_coverage(net_requirements: &[Decimal], params: &LotSizingParams) -> Vec<LotSizeReceipt> {
    let mut receipts = Vec::new();
    let mut coverage = Decimal::ZERO;

    for (t, &net) in net_requirements.iter().enumerate() {
        if net <= Decimal::ZERO {
            continue;
        }
        if coverage >= net {
            coverage -= net;
            continue;
        }
        let deficit = net - coverage;
        let raw_order = if params.eoq > Decimal::ZERO {
            params.eoq.max(deficit)
        } else {
            deficit
        };
        let ordered = apply_constraints(raw_order, params);
        receipts.push(LotSizeReceipt {
            period_index: t,
            quantity: ordered,
        });
        coverage = ordered - deficit;
    }

    receipts
}

/// Silver-Meal heuristic: grow the covered window while the running average
/// period cost keeps strictly decreasing.
fn silver_meal(net_requirements: &[Decimal], params: &LotSizingParams) -> Vec<LotSizeReceipt> {
    let n = net_requirements.len();
    let mut receipts = Vec::new();
    let mut i = 0;

    while i < n {
        if net_requirements[i] <= Decimal::ZERO {
            i += 1;
            continue;
        }

        let mut periods_covered = 1usize;
        let mut best_cost = params.order_cost;
        let mut j = i + 1;

        while j < n {
            let mut holding = Decimal::ZERO;
            for k in i..=j {
                holding += params.holding_cost_per_period * net_requirements[k] * Decimal::from((k - i) as i64);
            }
            let candidate_periods = j - i + 1;
            let candidate_cost = (params.order_cost + holding) / Decimal::from(candidate_periods as i64);
            if candidate_cost < best_cost {
                best_cost = candidate_cost;
                periods_covered = candidate_periods;
                j += 1;
            } else {
                break;
            }
        }

        let total_qty: Decimal = net_requirements[i..i + periods_covered].iter().sum();
        receipts.push(LotSizeReceipt {
            period_index: i,
            quantity: apply_constraints(total_qty, params),
        });
        i += periods_covered;
    }

    receipts
}

/// Wagner-Whitin optimal dynamic program over periods with positive demand,
/// preserving their original indices for holding-distance calculations.
fn wagner_whitin(net_requirements: &[Decimal], params: &LotSizingParams) -> Vec<LotSizeReceipt> {
    let orig_idx: Vec<usize> = (0..net_requirements.len())
        .filter(|&t| net_requirements[t] > Decimal::ZERO)
        .collect();
    let m = orig_idx.len();
    if m == 0 {
        return Vec::new();
    }
    let q: Vec<Decimal> = orig_idx.iter().map(|&t| net_requirements[t]).collect();

    // dp[0] == dp[-1] in the spec's 1-indexed notation: cost of covering
    // nothing before the first demand period.
    let mut dp = vec![Decimal::ZERO; m + 1];
    let mut backtrack = vec![0usize; m + 1];

    for j in 1..=m {
        let mut best: Option<Decimal> = None;
        let mut best_i = j;
        for i in 1..=j {
            let mut holding = Decimal::ZERO;
            for k in i..=j {
                let dist = orig_idx[k - 1] as i64 - orig_idx[i - 1] as i64;
                holding += params.holding_cost_per_period * q[k - 1] * Decimal::from(dist);
            }
            let cost = dp[i - 1] + params.order_cost + holding;
            if best.map_or(true, |b| cost < b) {
                best = Some(cost);
                best_i = i;
            }
        }
        dp[j] = best.unwrap();
        backtrack[j] = best_i;
    }

    let mut groups = Vec::new();
    let mut j = m;
    while j > 0 {
        let i = backtrack[j];
        groups.push((i, j));
        j = i - 1;
    }
    groups.reverse();

    groups
        .into_iter()
        .map(|(i, j)| {
            let total: Decimal = (i..=j).map(|p| q[p - 1]).sum();
            LotSizeReceipt {
                period_index: orig_idx[i - 1],
                quantity: apply_constraints(total, params),
            }
        })
        .collect()
}

/// `releaseIndex = receiptIndex − leadTimePeriods` (§4.6). Negative release
/// indices are reported past-due against the original receipt period;
/// receipts that fall outside the planning horizon are dropped.
fn offset_lead_time(receipts: &[LotSizeReceipt], lead_time_periods: u32, horizon_len: usize) -> Vec<LotSizeOrder> {
    receipts
        .iter()
        .filter(|r| r.period_index < horizon_len)
        .map(|r| {
            let release = r.period_index as i64 - lead_time_periods as i64;
            if release >= 0 {
                LotSizeOrder {
                    receipt_index: r.period_index,
                    release_index: Some(release as usize),
                    past_due: false,
                    quantity: r.quantity,
                }
            } else {
                LotSizeOrder {
                    receipt_index: r.period_index,
                    release_index: None,
                    past_due: true,
                    quantity: r.quantity,
                }
            }
        })
        .collect()
}
