//! Fundamental cycle basis of an edge set.
//!
//! A BFS spanning forest is grown from every unvisited node in ascending
//! order; each non-forest edge closes exactly one fundamental cycle. The basis
//! has `|E| - |V| + components` cycles and is empty iff the edge set is a
//! forest. Edges and neighbours are visited in sorted order, so the same edge
//! set always yields the same basis.

use std::collections::{HashSet, VecDeque};

use petgraph::graph::NodeIndex;

use crate::graph::{EdgeKey, NodeId, edge_set_graph};

/// Returns one edge list per fundamental cycle. Edges with an endpoint
/// outside `0..node_count` are ignored.
#[must_use]
pub fn cycle_basis(node_count: usize, edges: &[EdgeKey]) -> Vec<Vec<EdgeKey>> {
    let mut edges: Vec<EdgeKey> = edges
        .iter()
        .copied()
        .filter(|key| key.high() < node_count && !key.is_loop())
        .collect();
    edges.sort_unstable();
    edges.dedup();

    let graph = edge_set_graph(node_count, edges.iter().copied());
    let adjacency: Vec<Vec<NodeId>> = (0..node_count)
        .map(|node| {
            let mut neighbours: Vec<NodeId> = graph
                .neighbors(NodeIndex::new(node))
                .map(NodeIndex::index)
                .collect();
            neighbours.sort_unstable();
            neighbours
        })
        .collect();

    let mut parent: Vec<Option<NodeId>> = vec![None; node_count];
    let mut depth = vec![0_usize; node_count];
    let mut visited = vec![false; node_count];
    let mut forest: HashSet<EdgeKey> = HashSet::new();

    for root in 0..node_count {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            for &next in &adjacency[node] {
                if !visited[next] {
                    visited[next] = true;
                    parent[next] = Some(node);
                    depth[next] = depth[node] + 1;
                    forest.insert(EdgeKey::new(node, next));
                    queue.push_back(next);
                }
            }
        }
    }

    edges
        .iter()
        .filter(|key| !forest.contains(*key))
        .map(|&key| fundamental_cycle(key, &parent, &depth))
        .collect()
}

/// `true` when the edge set contains no cycle.
#[must_use]
pub fn is_acyclic(node_count: usize, edges: &[EdgeKey]) -> bool {
    cycle_basis(node_count, edges).is_empty()
}

fn fundamental_cycle(closing: EdgeKey, parent: &[Option<NodeId>], depth: &[usize]) -> Vec<EdgeKey> {
    let mut cycle = vec![closing];
    let (mut a, mut b) = closing.as_pair();

    while depth[a] > depth[b] {
        a = climb(a, parent, &mut cycle);
    }
    while depth[b] > depth[a] {
        b = climb(b, parent, &mut cycle);
    }
    while a != b {
        a = climb(a, parent, &mut cycle);
        b = climb(b, parent, &mut cycle);
    }
    cycle
}

fn climb(node: NodeId, parent: &[Option<NodeId>], cycle: &mut Vec<EdgeKey>) -> NodeId {
    match parent[node] {
        Some(up) => {
            cycle.push(EdgeKey::new(node, up));
            up
        }
        None => node,
    }
}
