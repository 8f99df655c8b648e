//! 木の辺に沿ったクラスラベル伝播。

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::graph::{EdgeKey, NodeId, edge_set_graph};

use super::{ClassTag, Prototypes};

/// Class per node; `None` means no prototype reached the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NodeClassAssignment(Vec<Option<ClassTag>>);

impl NodeClassAssignment {
    #[must_use]
    pub fn class_of(&self, node: NodeId) -> Option<&ClassTag> {
        self.0.get(node).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.0.iter().flatten().count()
    }

    /// Nodes left without a class, ascending.
    #[must_use]
    pub fn unassigned(&self) -> Vec<NodeId> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(node, class)| class.is_none().then_some(node))
            .collect()
    }

    /// Nodes carrying `class`, ascending.
    #[must_use]
    pub fn members(&self, class: &ClassTag) -> Vec<NodeId> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(node, tag)| (tag.as_ref() == Some(class)).then_some(node))
            .collect()
    }
}

/// Multi-source BFS seeded from every prototype at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeClassifier;

impl NodeClassifier {
    /// Frontiers advance round by round; the first frontier to reach a node
    /// claims it. Seeds are queued by ascending prototype node, so a node
    /// equidistant from two prototypes of one tree goes to the lower one.
    #[must_use]
    pub fn classify(
        node_count: usize,
        tree_edges: &[EdgeKey],
        prototypes: &Prototypes,
    ) -> NodeClassAssignment {
        let tree = edge_set_graph(node_count, tree_edges.iter().copied());
        let mut classes: Vec<Option<ClassTag>> = vec![None; node_count];
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        let mut seeds: Vec<(NodeId, &ClassTag)> = prototypes
            .iter()
            .map(|(class, &node)| (node, class))
            .collect();
        seeds.sort_unstable();

        for (node, class) in seeds {
            if node < node_count && classes[node].is_none() {
                classes[node] = Some(class.clone());
                queue.push_back(node);
            }
        }

        while let Some(node) = queue.pop_front() {
            let mut neighbours: Vec<NodeId> = tree
                .neighbors(NodeIndex::new(node))
                .map(NodeIndex::index)
                .collect();
            neighbours.sort_unstable();

            for next in neighbours {
                if classes[next].is_none() {
                    classes[next] = classes[node].clone();
                    queue.push_back(next);
                }
            }
        }

        let assignment = NodeClassAssignment(classes);
        tracing::info!(
            nodes = node_count,
            assigned = assignment.assigned_count(),
            unassigned = node_count - assignment.assigned_count(),
            "node classification completed"
        );
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pairs: &[(NodeId, NodeId)]) -> Vec<EdgeKey> {
        pairs.iter().map(|&pair| EdgeKey::from(pair)).collect()
    }

    #[test]
    fn each_component_takes_its_prototype_class() {
        let forest = keys(&[(0, 1), (1, 2), (3, 4), (4, 5)]);
        let prototypes = Prototypes::from([
            (ClassTag::Component(0), 0),
            (ClassTag::Component(1), 3),
        ]);
        let assignment = NodeClassifier::classify(6, &forest, &prototypes);

        assert_eq!(assignment.members(&ClassTag::Component(0)), vec![0, 1, 2]);
        assert_eq!(assignment.members(&ClassTag::Component(1)), vec![3, 4, 5]);
        assert!(assignment.unassigned().is_empty());
    }

    #[test]
    fn nearest_prototype_wins_on_a_path() {
        // 0 - 1 - 2 - 3 - 4 with prototypes at both ends.
        let path = keys(&[(0, 1), (1, 2), (2, 3), (3, 4)]);
        let prototypes = Prototypes::from([
            (ClassTag::Label("left".into()), 0),
            (ClassTag::Label("right".into()), 4),
        ]);
        let assignment = NodeClassifier::classify(5, &path, &prototypes);

        assert_eq!(assignment.members(&ClassTag::Label("right".into())), vec![3, 4]);
        assert_eq!(assignment.class_of(1), Some(&ClassTag::Label("left".into())));
        // Node 2 is equidistant; node 0 is seeded before node 4.
        assert_eq!(assignment.class_of(2), Some(&ClassTag::Label("left".into())));
    }

    #[test]
    fn equidistant_node_goes_to_the_lower_prototype_not_the_first_tag() {
        // 0 - 1 - 2, prototypes b at 0 and a at 2.
        let path = keys(&[(0, 1), (1, 2)]);
        let prototypes = Prototypes::from([
            (ClassTag::Label("a".into()), 2),
            (ClassTag::Label("b".into()), 0),
        ]);
        let assignment = NodeClassifier::classify(3, &path, &prototypes);

        assert_eq!(assignment.class_of(1), Some(&ClassTag::Label("b".into())));
        assert_eq!(assignment.members(&ClassTag::Label("a".into())), vec![2]);
    }

    #[test]
    fn unreachable_nodes_stay_unassigned() {
        let edges = keys(&[(0, 1)]);
        let prototypes = Prototypes::from([(ClassTag::Component(0), 0)]);
        let assignment = NodeClassifier::classify(3, &edges, &prototypes);

        assert_eq!(assignment.unassigned(), vec![2]);
        assert_eq!(assignment.class_of(2), None);
        assert_eq!(assignment.assigned_count(), 2);
        assert_eq!(assignment.len(), 3);
    }

    #[test]
    fn serialises_as_a_list_of_optional_classes() {
        let prototypes = Prototypes::from([(ClassTag::Label("a".into()), 0)]);
        let assignment = NodeClassifier::classify(3, &keys(&[(0, 1)]), &prototypes);
        let json = serde_json::to_string(&assignment).expect("serialisable");
        assert_eq!(json, r#"["a","a",null]"#);
    }
}
