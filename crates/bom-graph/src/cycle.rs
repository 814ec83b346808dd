use crate::arena::{Arena, NodeIndex};
use bom_core::{BomError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Grey,
    Black,
}

/// Runs a DFS with 3-color marking over every node in the arena and errors
/// on the first back edge found (§4.4 step 2). The error message lists the
/// cycle path, ending at the node that closes the loop, e.g. `A -> B -> C -> A`.
pub fn validate_acyclic(arena: &Arena) -> Result<()> {
    let mut color: HashMap<NodeIndex, Color> = HashMap::with_capacity(arena.node_count());
    for i in 0..arena.node_count() {
        color.insert(NodeIndex(i), Color::White);
    }

    for i in 0..arena.node_count() {
        let start = NodeIndex(i);
        if color[&start] == Color::White {
            let mut stack_path = Vec::new();
            if let Some(cycle) = visit(arena, start, &mut color, &mut stack_path) {
                let path = cycle
                    .iter()
                    .map(|n| arena.product_id(*n).to_string())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(BomError::CircularBom(path));
            }
        }
    }
    Ok(())
}

/// Returns the cycle path (start..=closing node) if a back edge is found
/// while descending from `node`.
fn visit(
    arena: &Arena,
    node: NodeIndex,
    color: &mut HashMap<NodeIndex, Color>,
    path: &mut Vec<NodeIndex>,
) -> Option<Vec<NodeIndex>> {
    color.insert(node, Color::Grey);
    path.push(node);

    for (child, _) in arena.children(node) {
        match color[&child] {
            Color::White => {
                if let Some(cycle) = visit(arena, child, color, path) {
                    return Some(cycle);
                }
            }
            Color::Grey => {
                // back edge: the cycle runs from child's position in `path` to here, plus child again
                let start = path.iter().position(|&n| n == child).unwrap_or(0);
                let mut cycle: Vec<NodeIndex> = path[start..].to_vec();
                cycle.push(child);
                return Some(cycle);
            }
            Color::Black => {}
        }
    }

    path.pop();
    color.insert(node, Color::Black);
    None
}
