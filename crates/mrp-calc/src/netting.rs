//! Net requirements (§4.5): the classic MRP grid, one row per weekly period.

use mrp_core::round4;
use rust_decimal::Decimal;

/// One period's netting row for a single product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetRequirement {
    pub period_index: usize,
    pub gross_requirement: Decimal,
    pub scheduled_receipt: Decimal,
    pub projected_stock: Decimal,
    pub net_requirement: Decimal,
}

/// Nets `gross_requirements` against `scheduled_receipts`, `initial_stock`,
/// and a constant safety stock `ss`, carrying `projStock` across periods.
/// Planned receipts are always 0 here — lot sizing fills them in later.
pub fn net_requirements(
    gross_requirements: &[Decimal],
    scheduled_receipts: &[Decimal],
    initial_stock: Decimal,
    ss: Decimal,
) -> Vec<NetRequirement> {
    let mut proj_stock = initial_stock;
    let mut rows = Vec::with_capacity(gross_requirements.len());

    for t in 0..gross_requirements.len() {
        let gross = gross_requirements[t];
        let scheduled = scheduled_receipts.get(t).copied().unwrap_or(Decimal::ZERO);
        let planned_receipt = Decimal::ZERO;

        let net_pre = gross - proj_stock - scheduled + ss;
        let mut net = net_pre.max(Decimal::ZERO);

        let next_proj_stock = round4(proj_stock + scheduled - gross + planned_receipt);

        if net == Decimal::ZERO && next_proj_stock < ss {
            net = round4(ss - next_proj_stock);
        }

        rows.push(NetRequirement {
            period_index: t,
            gross_requirement: round4(gross),
            scheduled_receipt: round4(scheduled),
            projected_stock: next_proj_stock,
            net_requirement: round4(net),
        });

        proj_stock = next_proj_stock;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nets_against_initial_stock() {
        let gross = vec![Decimal::from(100), Decimal::from(50), Decimal::from(30)];
        let scheduled = vec![Decimal::ZERO, Decimal::from(30), Decimal::ZERO];
        let rows = net_requirements(&gross, &scheduled, Decimal::from(20), Decimal::ZERO);

        assert_eq!(rows[0].net_requirement, Decimal::from(80));
        assert_eq!(rows[0].projected_stock, Decimal::from(-80));
        assert_eq!(rows[1].net_requirement, Decimal::from(100));
    }

    #[test]
    fn sufficient_stock_yields_zero_net() {
        let gross = vec![Decimal::from(50)];
        let scheduled = vec![Decimal::ZERO];
        let rows = net_requirements(&gross, &scheduled, Decimal::from(100), Decimal::from(20));

        assert_eq!(rows[0].net_requirement, Decimal::ZERO);
        assert_eq!(rows[0].projected_stock, Decimal::from(50));
    }

    #[test]
    fn safety_stock_floor_applies() {
        let gross = vec![Decimal::from(10)];
        let scheduled = vec![Decimal::ZERO];
        let rows = net_requirements(&gross, &scheduled, Decimal::from(100), Decimal::from(95));

        assert_eq!(rows[0].projected_stock, Decimal::from(90));
        assert_eq!(rows[0].net_requirement, Decimal::from(5));
    }

    #[test]
    fn negative_projected_stock_allowed_without_planned_receipts() {
        let gross = vec![Decimal::from(30), Decimal::from(30), Decimal::from(30)];
        let scheduled = vec![Decimal::ZERO; 3];
        let rows = net_requirements(&gross, &scheduled, Decimal::from(20), Decimal::ZERO);

        assert_eq!(rows[0].projected_stock, Decimal::from(-10));
        assert_eq!(rows[2].projected_stock, Decimal::from(-70));
        assert!(rows.iter().all(|r| r.net_requirement >= Decimal::ZERO));
    }
}
