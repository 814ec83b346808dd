use crate::arena::{Arena, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};

/// Deterministic topological order (parents before children), ties broken by
/// product id so identical inputs always explode in the same order
/// (invariant 4 — byte-identical output for identical input).
pub fn topological_order(arena: &Arena) -> Vec<NodeIndex> {
    let mut in_degree: Vec<usize> = (0..arena.node_count())
        .map(|i| arena.node(NodeIndex(i)).map(|n| n.incoming.len()).unwrap_or(0))
        .collect();

    let mut ready: Vec<NodeIndex> = (0..arena.node_count())
        .filter(|&i| in_degree[i] == 0)
        .map(NodeIndex)
        .collect();
    ready.sort_by(|a, b| arena.product_id(*a).cmp(arena.product_id(*b)));
    let mut queue: VecDeque<NodeIndex> = ready.into();

    let mut result = Vec::with_capacity(arena.node_count());
    while let Some(node) = queue.pop_front() {
        result.push(node);

        let mut newly_ready = Vec::new();
        for (child, _) in arena.children(node) {
            in_degree[child.0] -= 1;
            if in_degree[child.0] == 0 {
                newly_ready.push(child);
            }
        }
        newly_ready.sort_by(|a, b| arena.product_id(*a).cmp(arena.product_id(*b)));
        for n in newly_ready {
            queue.push_back(n);
        }
    }
    result
}

/// Low-level coding (§4.4 step 3, invariant 3): each node's code is the
/// maximum depth observed over all root-to-node paths. `extra_roots` carries
/// the FINISHED products that are also a child somewhere else in the graph —
/// structural roots (no incoming edge) are always included.
pub fn low_level_codes(arena: &Arena, extra_roots: &[NodeIndex]) -> HashMap<NodeIndex, usize> {
    let mut roots: HashSet<NodeIndex> = arena.structural_roots().into_iter().collect();
    roots.extend(extra_roots.iter().copied());

    let topo = topological_order(arena);
    let mut depth: HashMap<NodeIndex, usize> = HashMap::with_capacity(arena.node_count());
    for &r in &roots {
        depth.insert(r, 0);
    }

    for node in topo {
        let base = *depth.get(&node).unwrap_or(&0);
        for (child, _) in arena.children(node) {
            let candidate = base + 1;
            let entry = depth.entry(child).or_insert(0);
            if candidate > *entry {
                *entry = candidate;
            }
        }
    }

    for i in 0..arena.node_count() {
        depth.entry(NodeIndex(i)).or_insert(0);
    }
    depth
}

/// Groups nodes by their low-level code, index 0 = roots. Nodes in the same
/// group have no dependency on each other and may be exploded in parallel
/// (§5, §9 "Concurrency within a stage").
pub fn level_grouping(arena: &Arena, extra_roots: &[NodeIndex]) -> Vec<Vec<NodeIndex>> {
    let codes = low_level_codes(arena, extra_roots);
    let max_level = codes.values().copied().max().unwrap_or(0);

    let mut groups = vec![Vec::new(); max_level + 1];
    for (node, level) in codes {
        groups[level].push(node);
    }
    for group in &mut groups {
        group.sort_by(|a, b| arena.product_id(*a).cmp(arena.product_id(*b)));
    }
    groups
}
