use petgraph::unionfind::UnionFind;
use proptest::prelude::*;

use qubo_mst::classification::{ClassTag, PrototypeStrategy};
use qubo_mst::graph::{NodeId, WeightedGraph};
use qubo_mst::oracle::ExhaustiveOracle;
use qubo_mst::solver::{SolverConfig, cycle_basis, is_acyclic};
use qubo_mst::{EdgeKey, MstPipeline, PipelineReport};

/// Connected graph on `n` nodes: a random spanning tree plus random extra
/// edges, integer weights in 1..=9.
fn connected_graph() -> impl Strategy<Value = WeightedGraph> {
    (2_usize..=5)
        .prop_flat_map(|n| {
            let pairs = n * (n - 1) / 2;
            (
                Just(n),
                proptest::collection::vec(any::<usize>(), n - 1),
                proptest::collection::vec(1_u32..=9, pairs),
                proptest::collection::vec(any::<bool>(), pairs),
            )
        })
        .prop_map(|(n, parents, weights, extra)| {
            let tree: Vec<(NodeId, NodeId)> = parents
                .iter()
                .enumerate()
                .map(|(offset, parent)| (parent % (offset + 1), offset + 1))
                .collect();
            let mut edges = Vec::new();
            let mut k = 0;
            for u in 0..n {
                for v in (u + 1)..n {
                    if extra[k] || tree.contains(&(u, v)) {
                        edges.push((u, v, f64::from(weights[k])));
                    }
                    k += 1;
                }
            }
            WeightedGraph::new(n, edges).expect("generated graph is simple")
        })
}

fn kruskal_weight(graph: &WeightedGraph) -> f64 {
    let mut edges = graph.edges().to_vec();
    edges.sort_by(|a, b| a.weight.total_cmp(&b.weight));
    let mut sets = UnionFind::<usize>::new(graph.node_count());
    edges
        .iter()
        .filter(|edge| sets.union(edge.key.low(), edge.key.high()))
        .map(|edge| edge.weight)
        .sum()
}

fn run(graph: &WeightedGraph, strategy: PrototypeStrategy) -> PipelineReport {
    MstPipeline::new(ExhaustiveOracle::default(), SolverConfig::default(), strategy)
        .run(graph)
        .expect("connected graphs always solve")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn accepted_tree_is_a_minimum_spanning_tree(graph in connected_graph()) {
        let report = run(&graph, PrototypeStrategy::TopologyDriven);
        let tree: Vec<EdgeKey> = report.tree.iter().map(|&pair| EdgeKey::from(pair)).collect();

        prop_assert_eq!(tree.len(), graph.node_count() - 1);
        prop_assert!(is_acyclic(graph.node_count(), &tree));
        prop_assert!((report.total_weight - kruskal_weight(&graph)).abs() < 1e-9);
    }

    #[test]
    fn pipeline_is_deterministic(graph in connected_graph()) {
        let first = run(&graph, PrototypeStrategy::TopologyDriven);
        let second = run(&graph, PrototypeStrategy::TopologyDriven);
        prop_assert_eq!(first.tree, second.tree);
        prop_assert_eq!(first.prototypes, second.prototypes);
        prop_assert_eq!(first.classes, second.classes);
        prop_assert_eq!(first.iterations, second.iterations);
    }

    #[test]
    fn spanning_tree_puts_every_node_in_one_component_class(graph in connected_graph()) {
        let report = run(&graph, PrototypeStrategy::TopologyDriven);
        prop_assert_eq!(report.prototypes.len(), 1);
        for node in 0..graph.node_count() {
            prop_assert_eq!(report.classes.class_of(node), Some(&ClassTag::Component(0)));
        }
    }

    #[test]
    fn cycle_basis_is_stable_under_edge_order(graph in connected_graph()) {
        let mut keys: Vec<EdgeKey> = graph.edges().iter().map(|edge| edge.key).collect();
        let forward = cycle_basis(graph.node_count(), &keys);
        keys.reverse();
        let backward = cycle_basis(graph.node_count(), &keys);

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(
            forward.len(),
            graph.edge_count() + 1 - graph.node_count()
        );
    }
}
