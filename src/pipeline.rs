//! Solve → select prototypes → classify.

use std::sync::Arc;

use serde::Serialize;

use crate::classification::{
    NodeClassAssignment, NodeClassifier, PrototypeSelector, PrototypeStrategy, Prototypes,
};
use crate::error::PipelineError;
use crate::graph::{NodeId, WeightedGraph};
use crate::observability::Metrics;
use crate::oracle::OptimizationOracle;
use crate::solver::{CycleEliminationSolver, IterationRecord, SolverConfig};

/// Everything a run produces, ready for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub oracle: String,
    pub strategy: PrototypeStrategy,
    pub tree: Vec<(NodeId, NodeId)>,
    pub total_weight: f64,
    pub iterations: usize,
    pub cycle_constraints: usize,
    pub prototypes: Prototypes,
    pub classes: NodeClassAssignment,
    pub history: Vec<IterationRecord>,
    pub elapsed_ms: u128,
}

#[derive(Debug)]
pub struct MstPipeline<O> {
    solver: CycleEliminationSolver<O>,
    selector: PrototypeSelector,
}

impl<O: OptimizationOracle> MstPipeline<O> {
    pub fn new(oracle: O, solver_config: SolverConfig, strategy: PrototypeStrategy) -> Self {
        Self {
            solver: CycleEliminationSolver::new(oracle, solver_config),
            selector: PrototypeSelector::new(strategy),
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.solver = self.solver.with_metrics(metrics);
        self
    }

    /// Runs the whole pipeline on `graph`.
    ///
    /// # Errors
    /// Any [`SolveError`](crate::error::SolveError) from the solve loop, or a
    /// [`SelectionError`](crate::error::SelectionError) from prototype selection.
    pub fn run(&mut self, graph: &WeightedGraph) -> Result<PipelineReport, PipelineError> {
        let outcome = self.solver.solve(graph)?;
        let tree_edges = outcome.tree.edges();

        let prototypes = self.selector.select(graph, tree_edges)?;
        let classes = NodeClassifier::classify(graph.node_count(), tree_edges, &prototypes);

        Ok(PipelineReport {
            oracle: self.solver.oracle().name().to_owned(),
            strategy: self.selector.effective_strategy(graph),
            tree: outcome.tree.as_pairs(),
            total_weight: outcome.tree.total_weight(),
            iterations: outcome.iterations,
            cycle_constraints: outcome.cycle_constraints.len(),
            prototypes,
            classes,
            history: outcome.history,
            elapsed_ms: outcome.elapsed.as_millis(),
        })
    }
}
