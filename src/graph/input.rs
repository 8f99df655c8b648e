//! JSON graph documents.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{NodeId, WeightedGraph};

/// On-disk graph description.
///
/// ```json
/// { "edges": [[0, 1, 2.0], [1, 2, 1.0]], "labels": ["a", "a", "b"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub edges: Vec<(NodeId, NodeId, f64)>,
    /// Node count. Inferred as `max endpoint + 1` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl GraphDocument {
    /// Reads and parses a document from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read graph document: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse graph document: {}", path.display()))
    }

    /// Validates the document into a [`WeightedGraph`].
    pub fn into_graph(self) -> Result<WeightedGraph> {
        let graph = match self.nodes {
            Some(count) => WeightedGraph::new(count, self.edges),
            None => WeightedGraph::from_edges(self.edges),
        }
        .context("invalid graph document")?;

        let graph = match self.labels {
            Some(labels) => graph.with_labels(labels).context("invalid class labels")?,
            None => graph,
        };

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            labelled = graph.labels().is_some(),
            "graph loaded"
        );
        for edge in graph.edges() {
            tracing::debug!(edge = %edge.key, weight = edge.weight, "graph edge");
        }

        Ok(graph)
    }
}

/// Five-node demonstration graph whose minimum spanning tree weighs 6.
#[must_use]
pub fn demo_graph() -> GraphDocument {
    GraphDocument {
        edges: vec![
            (0, 1, 2.0),
            (0, 2, 3.0),
            (1, 2, 1.0),
            (1, 3, 4.0),
            (2, 3, 5.0),
            (2, 4, 2.0),
            (3, 4, 1.0),
        ],
        nodes: None,
        labels: None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ModelError;

    #[test]
    fn load_parses_edges_and_labels() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"edges": [[0, 1, 2], [1, 2, 1.5]], "labels": ["x", "x", "y"]}}"#
        )
        .expect("write document");

        let document = GraphDocument::load(file.path()).expect("document parses");
        assert_eq!(document.edges.len(), 2);

        let graph = document.into_graph().expect("graph validates");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.label(2), Some("y"));
    }

    #[test]
    fn explicit_node_count_keeps_isolated_nodes() {
        let document = GraphDocument {
            edges: vec![(0, 1, 1.0)],
            nodes: Some(3),
            labels: None,
        };
        let graph = document.into_graph().expect("graph validates");
        assert_eq!(graph.node_count(), 3);
        assert!(!graph.is_connected());
    }

    #[test]
    fn into_graph_rejects_self_loops() {
        let document = GraphDocument {
            edges: vec![(2, 2, 1.0)],
            nodes: None,
            labels: None,
        };
        assert!(document.into_graph().is_err());
    }

    #[test]
    fn oversized_documents_are_errors_not_panics() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"edges": [[0, {}, 1.0]]}}"#, usize::MAX).expect("write document");
        let document = GraphDocument::load(file.path()).expect("document parses");
        let error = document.into_graph().expect_err("node id too large");
        assert!(matches!(
            error.downcast_ref::<ModelError>(),
            Some(ModelError::TooManyNodes { .. })
        ));

        let document = GraphDocument {
            edges: vec![(0, 1, 1.0)],
            nodes: Some(usize::MAX),
            labels: None,
        };
        assert!(document.into_graph().is_err());
    }

    #[test]
    fn demo_graph_is_connected() {
        let graph = demo_graph().into_graph().expect("demo graph validates");
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 7);
        assert!(graph.is_connected());
    }
}
