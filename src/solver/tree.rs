use std::collections::HashSet;

use serde::Serialize;

use crate::error::SolveError;
use crate::graph::{EdgeKey, NodeId, WeightedGraph, component_labels};

/// A validated spanning tree of the input graph: exactly `n - 1` edges that
/// connect every node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedTree {
    node_count: usize,
    edges: Vec<EdgeKey>,
    total_weight: f64,
}

impl AcceptedTree {
    /// Checks that `edges` spans `graph` as a tree.
    ///
    /// # Errors
    /// [`SolveError::EmptyResult`] when the edge count is wrong, an edge is not
    /// part of the graph, or some node is left disconnected.
    pub fn validate(graph: &WeightedGraph, mut edges: Vec<EdgeKey>) -> Result<Self, SolveError> {
        let node_count = graph.node_count();
        let expected = node_count.saturating_sub(1);

        edges.sort_unstable();
        edges.dedup();

        if let Some(stray) = edges.iter().find(|&&key| !graph.contains_edge(key)) {
            return Err(SolveError::EmptyResult {
                reason: format!("edge {stray} is not part of the graph"),
            });
        }
        if edges.len() != expected {
            return Err(SolveError::EmptyResult {
                reason: format!("expected {expected} edges, got {}", edges.len()),
            });
        }

        let components = component_labels(node_count, edges.iter().copied())
            .into_iter()
            .collect::<HashSet<_>>()
            .len();
        if components > 1 {
            return Err(SolveError::EmptyResult {
                reason: format!("edges leave {components} disconnected components"),
            });
        }

        let total_weight = graph.total_weight(&edges);
        Ok(Self {
            node_count,
            edges,
            total_weight,
        })
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Tree edges in ascending key order.
    #[must_use]
    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    #[must_use]
    pub fn as_pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.edges.iter().map(|key| key.as_pair()).collect()
    }
}
