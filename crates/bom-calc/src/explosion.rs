use bom_core::Result;
use bom_graph::{level_grouping, Arena, NodeIndex};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

pub type PeriodMap = BTreeMap<DateTime<Utc>, Decimal>;
pub type RequirementsMap = HashMap<String, PeriodMap>;

fn round4(v: Decimal) -> Decimal {
    v.round_dp(4)
}

/// Multi-level BOM explosion (§4.4). Sweeps level 0 (roots) to `maxLevel`,
/// at each level propagating every node's period-keyed demand to its
/// children and accumulating contributions from shared parents
/// (invariant 2). Cycle detection (step 2) runs first.
pub fn explode(
    arena: &Arena,
    extra_roots: &[NodeIndex],
    mps_demand: &RequirementsMap,
) -> Result<RequirementsMap> {
    bom_graph::validate_acyclic(arena)?;

    let levels = level_grouping(arena, extra_roots);
    let mut requirements: RequirementsMap = HashMap::new();

    // Step 5: propagate MPS demand for the root products unchanged.
    if let Some(roots) = levels.first() {
        for &node in roots {
            let id = arena.product_id(node).to_string();
            if let Some(periods) = mps_demand.get(&id) {
                requirements.insert(id, periods.clone());
            }
        }
    }

    for level in &levels {
        // A node's own requirement map was finalized by a strictly earlier
        // level, so propagation to children within this level is independent
        // and safe to parallelize (§5, §9).
        let contributions: Vec<(NodeIndex, PeriodMap)> = level
            .par_iter()
            .flat_map_iter(|&node| {
                let id = arena.product_id(node).to_string();
                let own = requirements.get(&id).cloned().unwrap_or_default();
                arena
                    .children(node)
                    .map(|(child, edge)| {
                        let mut periods = PeriodMap::new();
                        for (&period, &qty) in &own {
                            if qty.is_zero() {
                                continue;
                            }
                            periods.insert(period, round4(edge.propagate(qty)));
                        }
                        (child, periods)
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        // Deterministic merge order: sort by child product id before
        // accumulating into the shared map (invariant 4).
        let mut sorted = contributions;
        sorted.sort_by(|a, b| arena.product_id(a.0).cmp(arena.product_id(b.0)));

        for (child, periods) in sorted {
            let id = arena.product_id(child).to_string();
            let entry = requirements.entry(id).or_default();
            for (period, qty) in periods {
                let acc = entry.entry(period).or_insert(Decimal::ZERO);
                *acc = round4(*acc + qty);
            }
        }
    }

    Ok(requirements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bom_core::BomEdge;
    use chrono::TimeZone;

    fn week(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap() + chrono::Duration::weeks(n)
    }

    fn demand(product: &str, values: &[(i64, i64)]) -> RequirementsMap {
        let mut map = RequirementsMap::new();
        let mut periods = PeriodMap::new();
        for &(w, qty) in values {
            periods.insert(week(w), Decimal::from(qty));
        }
        map.insert(product.to_string(), periods);
        map
    }

    fn edge(qty: i64, loss: i64) -> BomEdge {
        BomEdge::new(Decimal::from(qty), Decimal::from(loss))
    }

    /// S1 — single-level BOM: A -> B(2), A -> C(3), A -> D(1), MPS A=100/150.
    #[test]
    fn s1_single_level_bom() {
        let mut arena = Arena::new();
        let a = arena.add_node("A");
        let b = arena.add_node("B");
        let c = arena.add_node("C");
        let d = arena.add_node("D");
        arena.add_edge(a, b, edge(2, 0));
        arena.add_edge(a, c, edge(3, 0));
        arena.add_edge(a, d, edge(1, 0));

        let mps = demand("A", &[(0, 100), (1, 150)]);
        let result = explode(&arena, &[a], &mps).unwrap();

        assert_eq!(result["B"][&week(0)], Decimal::from(200));
        assert_eq!(result["B"][&week(1)], Decimal::from(300));
        assert_eq!(result["C"][&week(0)], Decimal::from(300));
        assert_eq!(result["C"][&week(1)], Decimal::from(450));
        assert_eq!(result["D"][&week(0)], Decimal::from(100));
        assert_eq!(result["D"][&week(1)], Decimal::from(150));
    }

    /// S2 — multi-level with loss: A -> B(2, 5%), B -> C(3, 2%), MPS A=100.
    #[test]
    fn s2_multilevel_with_loss() {
        let mut arena = Arena::new();
        let a = arena.add_node("A");
        let b = arena.add_node("B");
        let c = arena.add_node("C");
        arena.add_edge(a, b, edge(2, 5));
        arena.add_edge(b, c, edge(3, 2));

        let mps = demand("A", &[(0, 100)]);
        let result = explode(&arena, &[a], &mps).unwrap();

        assert_eq!(result["B"][&week(0)], Decimal::new(2100, 1)); // 210.0
        assert_eq!(result["C"][&week(0)], Decimal::new(6426, 1)); // 642.6
    }

    /// S3 — shared component: A->D(2), A->E(1), D->F(3), E->F(2), MPS A=100.
    #[test]
    fn s3_shared_component() {
        let mut arena = Arena::new();
        let a = arena.add_node("A");
        let d = arena.add_node("D");
        let e = arena.add_node("E");
        let f = arena.add_node("F");
        arena.add_edge(a, d, edge(2, 0));
        arena.add_edge(a, e, edge(1, 0));
        arena.add_edge(d, f, edge(3, 0));
        arena.add_edge(e, f, edge(2, 0));

        let mps = demand("A", &[(0, 100)]);
        let result = explode(&arena, &[a], &mps).unwrap();

        // D=200, E=100; F = 200*3 + 100*2 = 800
        assert_eq!(result["F"][&week(0)], Decimal::from(800));
    }

    #[test]
    fn s4_cycle_is_rejected() {
        let mut arena = Arena::new();
        let a = arena.add_node("A");
        let b = arena.add_node("B");
        let c = arena.add_node("C");
        arena.add_edge(a, b, edge(1, 0));
        arena.add_edge(b, c, edge(1, 0));
        arena.add_edge(c, a, edge(1, 0));

        let mps = demand("A", &[(0, 100)]);
        let err = explode(&arena, &[a], &mps).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("CIRCULAR_BOM"));
        assert!(msg.trim_end().ends_with('A'));
    }

    #[test]
    fn empty_bom_is_pass_through() {
        let mut arena = Arena::new();
        let a = arena.add_node("A");
        let mps = demand("A", &[(0, 42)]);
        let result = explode(&arena, &[a], &mps).unwrap();
        assert_eq!(result["A"][&week(0)], Decimal::from(42));
        assert_eq!(result.len(), 1);
    }
}
