use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::NodeId;

/// Generates a random edge list over `node_count` nodes.
///
/// Every pair `i < j` is included with probability 1/2 and receives an
/// integer weight drawn uniformly from `weight_min..=weight_max`. The same
/// seed always yields the same list.
#[must_use]
pub fn generate_edges(
    node_count: usize,
    weight_min: u32,
    weight_max: u32,
    seed: u64,
) -> Vec<(NodeId, NodeId, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (low, high) = if weight_min <= weight_max {
        (weight_min.max(1), weight_max.max(1))
    } else {
        (weight_max.max(1), weight_min.max(1))
    };

    let mut edges = Vec::new();
    for u in 0..node_count {
        for v in (u + 1)..node_count {
            if rng.random_bool(0.5) {
                let weight = rng.random_range(low..=high);
                edges.push((u, v, f64::from(weight)));
            }
        }
    }
    edges
}
