//! Storage validation (§4.10): cumulative per-warehouse-per-week volume
//! projection with a three-tier severity table.

use chrono::{DateTime, Utc};
use mrp_core::{round4, Warehouse};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageSeverity {
    Ok,
    Alert,
    Critical,
}

#[derive(Debug, Clone)]
pub struct StorageProjection {
    pub warehouse_id: String,
    pub week_start: DateTime<Utc>,
    pub projected_volume_m3: Decimal,
    pub capacity_percent: Decimal,
    pub severity: StorageSeverity,
}

/// A volume movement for one warehouse/week (positive = incoming, negative =
/// outgoing); callers derive these from planned receipts and MPS demand.
#[derive(Debug, Clone)]
pub struct VolumeDelta {
    pub warehouse_id: String,
    pub week_index: usize,
    pub delta_m3: Decimal,
}

/// Projects cumulative on-hand volume week over week for every eligible
/// warehouse (active, positive capacity) and classifies each week's
/// capacity percentage (§4.10: <=90 OK, (90,95] ALERT, >95 CRITICAL).
/// Volume is floored at 0 each week; warehouses without positive capacity
/// never participate.
pub fn project_storage(
    warehouses: &[Warehouse],
    deltas: &[VolumeDelta],
    week_buckets: &[DateTime<Utc>],
    initial_volume_m3: &std::collections::HashMap<String, Decimal>,
) -> Vec<StorageProjection> {
    let mut rows = Vec::new();

    for wh in warehouses {
        if !wh.eligible_for_validation() {
            continue;
        }
        let mut volume = initial_volume_m3.get(&wh.id).copied().unwrap_or(Decimal::ZERO);

        for (week_index, &week_start) in week_buckets.iter().enumerate() {
            let week_delta: Decimal = deltas
                .iter()
                .filter(|d| d.warehouse_id == wh.id && d.week_index == week_index)
                .map(|d| d.delta_m3)
                .sum();

            volume = (volume + week_delta).max(Decimal::ZERO);
            let projected = round4(volume);

            let pct = if wh.capacity_m3 > Decimal::ZERO {
                (projected / wh.capacity_m3 * Decimal::from(100)).round_dp(2)
            } else {
                Decimal::ZERO
            };

            rows.push(StorageProjection {
                warehouse_id: wh.id.clone(),
                week_start,
                projected_volume_m3: projected,
                capacity_percent: pct,
                severity: classify(pct),
            });
        }
    }

    rows
}

fn classify(capacity_percent: Decimal) -> StorageSeverity {
    if capacity_percent <= Decimal::from(90) {
        StorageSeverity::Ok
    } else if capacity_percent <= Decimal::from(95) {
        StorageSeverity::Alert
    } else {
        StorageSeverity::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use std::collections::HashMap;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn inactive_or_zero_capacity_warehouses_are_excluded() {
        let warehouses = vec![
            Warehouse::new("W1", "W1").with_capacity_m3(Decimal::ZERO),
            Warehouse::new("W2", "W2").with_capacity_m3(Decimal::from(100)).inactive(),
        ];
        let rows = project_storage(&warehouses, &[], &[day(2026, 1, 5)], &HashMap::new());
        assert!(rows.is_empty());
    }

    #[test]
    fn volume_is_floored_at_zero() {
        let warehouses = vec![Warehouse::new("W1", "W1").with_capacity_m3(Decimal::from(100))];
        let deltas = vec![VolumeDelta { warehouse_id: "W1".into(), week_index: 0, delta_m3: Decimal::from(-50) }];
        let rows = project_storage(&warehouses, &deltas, &[day(2026, 1, 5)], &HashMap::new());
        assert_eq!(rows[0].projected_volume_m3, Decimal::ZERO);
    }

    #[rstest]
    #[case(Decimal::ZERO, StorageSeverity::Ok)]
    #[case(Decimal::from(90), StorageSeverity::Ok)]
    #[case(Decimal::new(9001, 2), StorageSeverity::Alert)]
    #[case(Decimal::from(95), StorageSeverity::Alert)]
    #[case(Decimal::new(9501, 2), StorageSeverity::Critical)]
    #[case(Decimal::from(100), StorageSeverity::Critical)]
    #[case(Decimal::from(120), StorageSeverity::Critical)]
    fn severity_table_boundaries(#[case] capacity_percent: Decimal, #[case] expected: StorageSeverity) {
        assert_eq!(classify(capacity_percent), expected);
    }

    #[test]
    fn cumulative_volume_carries_across_weeks() {
        let warehouses = vec![Warehouse::new("W1", "W1").with_capacity_m3(Decimal::from(1000))];
        let deltas = vec![
            VolumeDelta { warehouse_id: "W1".into(), week_index: 0, delta_m3: Decimal::from(100) },
            VolumeDelta { warehouse_id: "W1".into(), week_index: 1, delta_m3: Decimal::from(50) },
        ];
        let weeks = vec![day(2026, 1, 5), day(2026, 1, 12)];
        let rows = project_storage(&warehouses, &deltas, &weeks, &HashMap::new());
        assert_eq!(rows[0].projected_volume_m3, Decimal::from(100));
        assert_eq!(rows[1].projected_volume_m3, Decimal::from(150));
    }
}
