use std::collections::{BTreeMap, BTreeSet};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::graph::{EdgeKey, NodeId, WeightedGraph, component_labels};

use super::ClassTag;

/// Class → representative node.
pub type Prototypes = BTreeMap<ClassTag, NodeId>;

/// プロトタイプの選び方。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrototypeStrategy {
    /// Class-driven when the graph carries labels, topology-driven otherwise.
    #[default]
    Auto,
    /// First tree node bearing each label.
    #[value(name = "class", alias = "class-driven")]
    ClassDriven,
    /// Minimum-degree node of each tree component.
    #[value(name = "topology", alias = "topology-driven")]
    TopologyDriven,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrototypeSelector {
    strategy: PrototypeStrategy,
}

impl PrototypeSelector {
    #[must_use]
    pub fn new(strategy: PrototypeStrategy) -> Self {
        Self { strategy }
    }

    /// `Auto` の解決結果。
    #[must_use]
    pub fn effective_strategy(&self, graph: &WeightedGraph) -> PrototypeStrategy {
        match self.strategy {
            PrototypeStrategy::Auto if graph.labels().is_some() => PrototypeStrategy::ClassDriven,
            PrototypeStrategy::Auto => PrototypeStrategy::TopologyDriven,
            explicit => explicit,
        }
    }

    /// Picks one prototype per class (class-driven) or per component of
    /// `tree_edges` (topology-driven).
    ///
    /// # Errors
    /// [`SelectionError::MissingLabels`] for class-driven selection on an
    /// unlabeled graph, [`SelectionError::NoPrototypes`] when nothing could be
    /// selected.
    pub fn select(
        &self,
        graph: &WeightedGraph,
        tree_edges: &[EdgeKey],
    ) -> Result<Prototypes, SelectionError> {
        let strategy = self.effective_strategy(graph);
        let nodes = tree_nodes(graph, tree_edges);

        let prototypes = match strategy {
            PrototypeStrategy::ClassDriven => select_by_class(graph, &nodes)?,
            _ => select_by_topology(graph, tree_edges, &nodes),
        };
        if prototypes.is_empty() {
            return Err(SelectionError::NoPrototypes);
        }

        tracing::info!(
            strategy = ?strategy,
            prototypes = prototypes.len(),
            "prototypes selected"
        );
        for (class, node) in &prototypes {
            tracing::debug!(%class, node, "prototype");
        }
        Ok(prototypes)
    }
}

/// Nodes spanned by the tree. A tree without edges is the single-node tree,
/// so every graph node counts.
fn tree_nodes(graph: &WeightedGraph, tree_edges: &[EdgeKey]) -> BTreeSet<NodeId> {
    if tree_edges.is_empty() {
        return (0..graph.node_count()).collect();
    }
    tree_edges
        .iter()
        .flat_map(|key| [key.low(), key.high()])
        .filter(|&node| node < graph.node_count())
        .collect()
}

fn select_by_class(
    graph: &WeightedGraph,
    nodes: &BTreeSet<NodeId>,
) -> Result<Prototypes, SelectionError> {
    if graph.labels().is_none() {
        return Err(SelectionError::MissingLabels);
    }

    let mut prototypes = Prototypes::new();
    for &node in nodes {
        let Some(label) = graph.label(node).filter(|label| !label.is_empty()) else {
            continue;
        };
        prototypes
            .entry(ClassTag::Label(label.to_owned()))
            .or_insert(node);
    }
    Ok(prototypes)
}

fn select_by_topology(
    graph: &WeightedGraph,
    tree_edges: &[EdgeKey],
    nodes: &BTreeSet<NodeId>,
) -> Prototypes {
    let labels = component_labels(graph.node_count(), tree_edges.iter().copied());

    // component representative -> (degree, node) of the best node so far
    let mut best: BTreeMap<NodeId, (usize, NodeId)> = BTreeMap::new();
    for &node in nodes {
        let candidate = (graph.degree(node), node);
        best.entry(labels[node])
            .and_modify(|current| {
                if candidate < *current {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    // Components are numbered by their lowest node.
    let mut components: Vec<(NodeId, NodeId)> = nodes
        .iter()
        .filter_map(|&node| best.remove(&labels[node]).map(|(_, prototype)| (node, prototype)))
        .collect();
    components.sort_unstable();

    components
        .into_iter()
        .enumerate()
        .map(|(index, (_, prototype))| (ClassTag::Component(index), prototype))
        .collect()
}
