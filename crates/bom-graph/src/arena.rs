use bom_core::BomEdge;
use std::collections::HashMap;

/// Index of a product node in the arena. Stable for the lifetime of the
/// arena; never reused after removal (the arena never removes nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeIndex(pub usize);

#[derive(Debug, Clone)]
pub struct Node {
    pub product_id: String,
    pub outgoing: Vec<EdgeIndex>,
    pub incoming: Vec<EdgeIndex>,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub weight: BomEdge,
}

/// Parent -> child adjacency for the BOM graph, stored arena-style (nodes and
/// edges in flat `Vec`s, referenced by index) rather than as an object graph
/// with pointers — the traversal algorithms only need product ids and BOM
/// quantity/loss weights, never a mutable reference into another node.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<String, NodeIndex>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            index: HashMap::with_capacity(node_capacity),
        }
    }

    /// Inserts the node if absent, returning its index either way.
    pub fn add_node(&mut self, product_id: impl Into<String>) -> NodeIndex {
        let product_id = product_id.into();
        if let Some(&idx) = self.index.get(&product_id) {
            return idx;
        }
        let idx = NodeIndex(self.nodes.len());
        self.nodes.push(Node {
            product_id: product_id.clone(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        self.index.insert(product_id, idx);
        idx
    }

    pub fn add_edge(&mut self, parent: NodeIndex, child: NodeIndex, weight: BomEdge) -> EdgeIndex {
        let idx = EdgeIndex(self.edges.len());
        self.edges.push(Edge {
            source: parent,
            target: child,
            weight,
        });
        self.nodes[parent.0].outgoing.push(idx);
        self.nodes[child.0].incoming.push(idx);
        idx
    }

    pub fn find_node(&self, product_id: &str) -> Option<NodeIndex> {
        self.index.get(product_id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.0)
    }

    pub fn edge(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.edges.get(idx.0)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn children(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, BomEdge)> + '_ {
        self.nodes[node.0]
            .outgoing
            .iter()
            .map(move |&e| (self.edges[e.0].target, self.edges[e.0].weight))
    }

    pub fn parents(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, BomEdge)> + '_ {
        self.nodes[node.0]
            .incoming
            .iter()
            .map(move |&e| (self.edges[e.0].source, self.edges[e.0].weight))
    }

    pub fn product_id(&self, node: NodeIndex) -> &str {
        &self.nodes[node.0].product_id
    }

    /// Nodes with no incoming BOM line - structural roots. Does not include
    /// FINISHED products that happen to be used as a component elsewhere;
    /// callers merge those in explicitly (see §4.4 step 3).
    pub fn structural_roots(&self) -> Vec<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.incoming.is_empty())
            .map(|(i, _)| NodeIndex(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn add_node_is_idempotent() {
        let mut arena = Arena::new();
        let a1 = arena.add_node("A");
        let a2 = arena.add_node("A");
        assert_eq!(a1, a2);
        assert_eq!(arena.node_count(), 1);
    }

    #[test]
    fn children_and_parents_round_trip() {
        let mut arena = Arena::new();
        let a = arena.add_node("A");
        let b = arena.add_node("B");
        arena.add_edge(a, b, BomEdge::new(Decimal::from(2), Decimal::ZERO));

        let children: Vec<_> = arena.children(a).map(|(n, _)| n).collect();
        assert_eq!(children, vec![b]);

        let parents: Vec<_> = arena.parents(b).map(|(n, _)| n).collect();
        assert_eq!(parents, vec![a]);
    }
}
