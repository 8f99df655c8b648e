//! Weighted undirected graph shared by model building, solving and classification.

pub mod generate;
pub mod input;

use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

pub use generate::generate_edges;
pub use input::{GraphDocument, demo_graph};

/// Node identifier. Nodes are always the dense range `0..node_count`.
pub type NodeId = usize;

/// Largest node count a graph may declare or imply.
pub const MAX_NODES: usize = 1 << 20;

/// Canonical key of an undirected edge: `(min, max)` regardless of the order
/// the endpoints were supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    low: NodeId,
    high: NodeId,
}

impl EdgeKey {
    #[must_use]
    pub fn new(u: NodeId, v: NodeId) -> Self {
        Self {
            low: u.min(v),
            high: u.max(v),
        }
    }

    #[must_use]
    pub fn low(self) -> NodeId {
        self.low
    }

    #[must_use]
    pub fn high(self) -> NodeId {
        self.high
    }

    #[must_use]
    pub fn is_loop(self) -> bool {
        self.low == self.high
    }

    #[must_use]
    pub fn as_pair(self) -> (NodeId, NodeId) {
        (self.low, self.high)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

impl From<(NodeId, NodeId)> for EdgeKey {
    fn from((u, v): (NodeId, NodeId)) -> Self {
        Self::new(u, v)
    }
}

/// A weighted undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub key: EdgeKey,
    pub weight: f64,
}

impl Edge {
    #[must_use]
    pub fn new(u: NodeId, v: NodeId, weight: f64) -> Self {
        Self {
            key: EdgeKey::new(u, v),
            weight,
        }
    }
}

/// Simple weighted undirected graph over nodes `0..node_count`, with optional
/// per-node class labels supplied from outside.
///
/// Construction validates the simple-graph contract: no self-loops, no
/// duplicate unordered pairs, endpoints in range, finite positive weights.
/// The graph is immutable afterwards.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    node_count: usize,
    edges: Vec<Edge>,
    lookup: HashMap<EdgeKey, usize>,
    incident: Vec<Vec<usize>>,
    labels: Option<Vec<String>>,
}

impl WeightedGraph {
    /// Builds a graph with an explicit node count.
    ///
    /// # Errors
    /// Returns [`ModelError`] when `node_count` exceeds [`MAX_NODES`], or when
    /// an edge is a self-loop, a duplicate, out of range, or carries a
    /// non-finite or non-positive weight.
    pub fn new<I>(node_count: usize, edges: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (NodeId, NodeId, f64)>,
    {
        if node_count > MAX_NODES {
            return Err(ModelError::TooManyNodes {
                node_count,
                limit: MAX_NODES,
            });
        }

        let mut graph = Self {
            node_count,
            edges: Vec::new(),
            lookup: HashMap::new(),
            incident: vec![Vec::new(); node_count],
            labels: None,
        };

        for (u, v, weight) in edges {
            let key = EdgeKey::new(u, v);
            if key.is_loop() {
                return Err(ModelError::SelfLoop { node: u });
            }
            if key.high() >= node_count {
                return Err(ModelError::NodeOutOfRange {
                    edge: key,
                    node_count,
                });
            }
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ModelError::InvalidWeight { edge: key, weight });
            }
            if graph.lookup.contains_key(&key) {
                return Err(ModelError::DuplicateEdge { edge: key });
            }

            let index = graph.edges.len();
            graph.edges.push(Edge { key, weight });
            graph.lookup.insert(key, index);
            graph.incident[key.low()].push(index);
            graph.incident[key.high()].push(index);
        }

        Ok(graph)
    }

    /// Builds a graph whose node count is inferred as `max endpoint + 1`.
    ///
    /// # Errors
    /// Same as [`WeightedGraph::new`].
    pub fn from_edges<I>(edges: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (NodeId, NodeId, f64)>,
    {
        let edges: Vec<(NodeId, NodeId, f64)> = edges.into_iter().collect();
        let Some(highest) = edges.iter().map(|&(u, v, _)| u.max(v)).max() else {
            return Self::new(0, edges);
        };
        let node_count = highest
            .checked_add(1)
            .ok_or(ModelError::TooManyNodes {
                node_count: highest,
                limit: MAX_NODES,
            })?;
        Self::new(node_count, edges)
    }

    /// Attaches one class label per node.
    ///
    /// # Errors
    /// Returns [`ModelError::LabelCountMismatch`] when `labels.len()` differs
    /// from the node count.
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self, ModelError> {
        if labels.len() != self.node_count {
            return Err(ModelError::LabelCountMismatch {
                expected: self.node_count,
                actual: labels.len(),
            });
        }
        self.labels = Some(labels);
        Ok(self)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn contains_edge(&self, key: EdgeKey) -> bool {
        self.lookup.contains_key(&key)
    }

    #[must_use]
    pub fn weight(&self, key: EdgeKey) -> Option<f64> {
        self.lookup.get(&key).map(|&index| self.edges[index].weight)
    }

    /// Edges incident to `node`, in insertion order. Empty for unknown nodes.
    pub fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incident
            .get(node)
            .into_iter()
            .flatten()
            .map(|&index| &self.edges[index])
    }

    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.incident.get(node).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    #[must_use]
    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(node))
            .map(String::as_str)
    }

    /// Sum of the weights of the given edges; edges absent from the graph count as zero.
    #[must_use]
    pub fn total_weight<'a, I>(&self, keys: I) -> f64
    where
        I: IntoIterator<Item = &'a EdgeKey>,
    {
        keys.into_iter().filter_map(|&key| self.weight(key)).sum()
    }

    /// Number of connected components, isolated nodes included.
    #[must_use]
    pub fn component_count(&self) -> usize {
        component_labels(self.node_count, self.edges.iter().map(|edge| edge.key))
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .len()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }
}

/// Builds a petgraph view of `node_count` nodes and the given edges.
/// `NodeIndex::new(i)` corresponds to node `i`.
#[must_use]
pub fn edge_set_graph<I>(node_count: usize, edges: I) -> UnGraph<NodeId, EdgeKey>
where
    I: IntoIterator<Item = EdgeKey>,
{
    let mut graph = UnGraph::with_capacity(node_count, node_count.saturating_sub(1));
    for node in 0..node_count {
        graph.add_node(node);
    }
    for key in edges {
        if key.high() < node_count {
            graph.add_edge(NodeIndex::new(key.low()), NodeIndex::new(key.high()), key);
        }
    }
    graph
}

/// Component representative per node. Two nodes share a label iff they are
/// connected by the given edges.
#[must_use]
pub fn component_labels<I>(node_count: usize, edges: I) -> Vec<NodeId>
where
    I: IntoIterator<Item = EdgeKey>,
{
    let mut sets = UnionFind::<NodeId>::new(node_count);
    for key in edges {
        if key.high() < node_count {
            sets.union(key.low(), key.high());
        }
    }
    sets.into_labeling()
}
