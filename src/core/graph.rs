use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

use crate::core::dataset::{CellValue, format_number};
use crate::core::force_layout::{SpringLayoutConfig, spring_layout};
use crate::core::types::Point;

/// Identity of a network node.
///
/// Numbers compare by value (`1` and `1.0` are one node) but never equal
/// text, so a numeric `1` and the string `"1"` stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Number(OrderedFloat<f64>),
    Bool(bool),
    Text(String),
}

impl NodeKey {
    /// Key for a cell; missing cells have none.
    #[must_use]
    pub fn from_cell(cell: &CellValue) -> Option<Self> {
        match cell {
            CellValue::Number(value) => Some(Self::Number(OrderedFloat(*value))),
            CellValue::Bool(value) => Some(Self::Bool(*value)),
            CellValue::Text(text) => Some(Self::Text(text.clone())),
            CellValue::Missing => None,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => f.write_str(&format_number(value.0)),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for NodeKey {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for NodeKey {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for NodeKey {
    fn from(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }
}

/// Undirected node-link graph built from a source/target edge list.
///
/// Repeated edges collapse into one, and so does an edge listed in both
/// directions. Nodes keep first-appearance order and carry their display
/// label as the node weight.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    graph: UnGraph<String, ()>,
    index_by_key: IndexMap<NodeKey, NodeIndex>,
    positions: Vec<Point>,
}

impl NetworkGraph {
    pub fn from_edges<I, K>(edges: I) -> Self
    where
        I: IntoIterator<Item = (K, K)>,
        K: Into<NodeKey>,
    {
        let mut network = Self {
            graph: UnGraph::new_undirected(),
            index_by_key: IndexMap::new(),
            positions: Vec::new(),
        };
        let mut edge_rows = 0_usize;
        for (source, target) in edges {
            let source = network.ensure_node(source.into());
            let target = network.ensure_node(target.into());
            network.graph.update_edge(source, target, ());
            edge_rows += 1;
        }
        debug!(
            edge_rows,
            nodes = network.node_count(),
            edges = network.edge_count(),
            "built network graph"
        );
        network
    }

    fn ensure_node(&mut self, key: NodeKey) -> NodeIndex {
        if let Some(index) = self.index_by_key.get(&key) {
            return *index;
        }
        let index = self.graph.add_node(key.to_string());
        self.index_by_key.insert(key, index);
        index
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn graph(&self) -> &UnGraph<String, ()> {
        &self.graph
    }

    /// Display labels in node order; distinct nodes may share a label.
    pub fn node_labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(String::as_str)
    }

    pub fn node_keys(&self) -> impl Iterator<Item = &NodeKey> + '_ {
        self.index_by_key.keys()
    }

    #[must_use]
    pub fn contains_edge(&self, a: impl Into<NodeKey>, b: impl Into<NodeKey>) -> bool {
        match (self.index_by_key.get(&a.into()), self.index_by_key.get(&b.into())) {
            (Some(a), Some(b)) => self.graph.find_edge(*a, *b).is_some(),
            _ => false,
        }
    }

    /// Runs the spring layout and stores one position per node.
    pub fn apply_layout(&mut self, config: SpringLayoutConfig) {
        self.positions = spring_layout(&self.graph, config);
    }

    #[must_use]
    pub fn has_layout(&self) -> bool {
        self.positions.len() == self.node_count()
    }

    #[must_use]
    pub fn position(&self, key: impl Into<NodeKey>) -> Option<Point> {
        let index = self.index_by_key.get(&key.into())?;
        self.positions.get(index.index()).copied()
    }

    /// Node positions in node order; empty before `apply_layout`.
    #[must_use]
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::{NetworkGraph, NodeKey};

    #[test]
    fn reversed_and_repeated_edges_collapse() {
        let graph = NetworkGraph::from_edges([("A", "B"), ("B", "A"), ("A", "B"), ("B", "C")]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge("C", "B"));
    }

    #[test]
    fn self_loop_counts_as_one_edge() {
        let graph = NetworkGraph::from_edges([("A", "A"), ("A", "A")]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn numbers_and_text_with_the_same_label_stay_distinct() {
        let graph = NetworkGraph::from_edges([
            (NodeKey::from(1.0), NodeKey::from("1")),
            (NodeKey::from(1.0), NodeKey::from(2.0)),
        ]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node_labels().collect::<Vec<_>>(), vec!["1", "1", "2"]);
        assert!(graph.contains_edge(1.0, "1"));
        assert!(!graph.contains_edge("1", 2.0));
    }
}
