use std::time::Duration;

use crate::error::OracleError;
use crate::qubo::{Assignment, QuboModel};

use super::OptimizationOracle;
use super::budget::TimeBudget;

/// Hard ceiling on enumerated variables regardless of configuration.
pub const MAX_EXHAUSTIVE_VARIABLES: usize = 30;

const BUDGET_CHECK_INTERVAL: u64 = 4096;

/// Exact backend: enumerates all `2^m` assignments and returns the cheapest
/// one satisfying every linear constraint. Ties go to the lowest bit pattern,
/// so the answer is deterministic.
#[derive(Debug, Clone)]
pub struct ExhaustiveOracle {
    limit: usize,
    timeout: Duration,
}

impl ExhaustiveOracle {
    #[must_use]
    pub fn new(limit: usize, timeout: Duration) -> Self {
        Self {
            limit: limit.min(MAX_EXHAUSTIVE_VARIABLES),
            timeout,
        }
    }
}

impl Default for ExhaustiveOracle {
    fn default() -> Self {
        Self::new(22, Duration::from_secs(30))
    }
}

impl OptimizationOracle for ExhaustiveOracle {
    fn name(&self) -> &str {
        "exhaustive"
    }

    fn solve(&mut self, model: &QuboModel) -> Result<Assignment, OracleError> {
        let variables = model.variable_count();
        if variables > self.limit {
            return Err(OracleError::ProblemTooLarge {
                variables,
                limit: self.limit,
            });
        }

        let budget = TimeBudget::start(self.timeout);
        let mut bits = vec![false; variables];
        let mut best: Option<(f64, u64)> = None;

        for mask in 0..(1_u64 << variables) {
            if mask % BUDGET_CHECK_INTERVAL == 0 {
                budget.check()?;
            }
            for (index, bit) in bits.iter_mut().enumerate() {
                *bit = mask & (1 << index) != 0;
            }
            if !model.is_feasible(&bits) {
                continue;
            }
            let cost = model.objective_value(&bits) + model.penalty_value(&bits);
            if best.is_none_or(|(best_cost, _)| cost < best_cost) {
                best = Some((cost, mask));
            }
        }

        let (cost, mask) = best.ok_or(OracleError::Infeasible)?;
        tracing::debug!(
            variables,
            cost,
            elapsed_ms = budget.elapsed().as_millis(),
            "exhaustive search finished"
        );

        let bits: Vec<bool> = (0..variables).map(|index| mask & (1 << index) != 0).collect();
        Ok(Assignment::from_bits(&bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeKey, WeightedGraph};
    use crate::qubo::{CycleConstraint, build_model};

    /// Cheap triangle 0-1-2, cheap edge 3-4, expensive bridge 2-3.
    fn triangle_and_bridge() -> WeightedGraph {
        WeightedGraph::from_edges([
            (0, 1, 1.0),
            (1, 2, 1.0),
            (0, 2, 1.0),
            (3, 4, 1.0),
            (2, 3, 10.0),
        ])
        .expect("valid graph")
    }

    #[test]
    fn finds_cheapest_feasible_assignment() {
        let graph = triangle_and_bridge();
        let model = build_model(&graph, &[]).expect("model builds");
        let mut oracle = ExhaustiveOracle::default();

        let assignment = oracle.solve(&model).expect("feasible model");
        let bits = model.decode(&assignment).expect("binary answer");
        assert!(model.is_feasible(&bits));

        // Without cuts the cyclic triangle plus (3,4) is cheapest.
        assert!((model.objective_value(&bits) - 4.0).abs() < f64::EPSILON);
        assert_eq!(
            model.selected_edges(&bits),
            vec![
                EdgeKey::new(0, 1),
                EdgeKey::new(1, 2),
                EdgeKey::new(0, 2),
                EdgeKey::new(3, 4)
            ]
        );
    }

    #[test]
    fn respects_cycle_cuts() {
        let graph = triangle_and_bridge();
        let cut = CycleConstraint::from_cycle(vec![
            EdgeKey::new(0, 1),
            EdgeKey::new(1, 2),
            EdgeKey::new(0, 2),
        ]);
        let model = build_model(&graph, &[cut]).expect("model builds");
        let assignment = ExhaustiveOracle::default()
            .solve(&model)
            .expect("feasible model");
        let bits = model.decode(&assignment).expect("binary answer");
        assert!((model.objective_value(&bits) - 13.0).abs() < f64::EPSILON);
        assert!(bits[model.variables().get(EdgeKey::new(2, 3)).expect("bridge").index()]);
    }

    #[test]
    fn rejects_models_above_the_limit() {
        let graph = triangle_and_bridge();
        let model = build_model(&graph, &[]).expect("model builds");
        let mut oracle = ExhaustiveOracle::new(3, Duration::from_secs(1));
        assert_eq!(
            oracle.solve(&model),
            Err(OracleError::ProblemTooLarge {
                variables: 5,
                limit: 3
            })
        );
    }

    #[test]
    fn reports_infeasible_models() {
        // Node 2 is isolated, so its connectivity constraint can never hold.
        let graph = WeightedGraph::new(3, [(0, 1, 1.0)]).expect("valid graph");
        let model = build_model(&graph, &[]).expect("model builds");
        assert_eq!(
            ExhaustiveOracle::default().solve(&model),
            Err(OracleError::Infeasible)
        );
    }
}
