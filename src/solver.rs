//! Cutting-plane MST search.
//!
//! The loop walks BUILD → SOLVE → CHECK → {ACCEPT | REPAIR → BUILD}. Every
//! iteration rebuilds the model from the graph plus the accumulated cycle
//! constraints, asks the oracle once, and either accepts the acyclic candidate
//! or adds one constraint per fundamental cycle of the candidate.

pub mod cycles;
pub mod tree;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{ModelError, SolveError};
use crate::graph::{EdgeKey, WeightedGraph};
use crate::observability::Metrics;
use crate::oracle::OptimizationOracle;
use crate::qubo::build_model;

pub use crate::qubo::CycleConstraint;
pub use cycles::{cycle_basis, is_acyclic};
pub use tree::AcceptedTree;

/// Loop configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SolverConfig {
    /// Hard cap on iterations. `None` means `max(1, m²)` for `m` edges.
    pub max_iterations: Option<usize>,
}

impl SolverConfig {
    #[must_use]
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
        }
    }

    #[must_use]
    pub fn iteration_bound(&self, edge_count: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| edge_count.saturating_mul(edge_count))
            .max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveState {
    Build,
    Solve,
    Check,
    Repair,
    Accept,
}

/// Diagnostics for one loop iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub candidate: Vec<EdgeKey>,
    pub cycles: usize,
    pub objective: f64,
    /// Constraints in force after this iteration's REPAIR step.
    pub accumulated_constraints: usize,
    pub oracle_elapsed_ms: u128,
    /// `Repair` or `Accept`.
    pub outcome: SolveState,
}

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub tree: AcceptedTree,
    pub iterations: usize,
    pub cycle_constraints: Vec<CycleConstraint>,
    pub history: Vec<IterationRecord>,
    pub elapsed: Duration,
}

/// Drives an [`OptimizationOracle`] until it returns a spanning tree.
#[derive(Debug)]
pub struct CycleEliminationSolver<O> {
    oracle: O,
    config: SolverConfig,
    metrics: Option<Arc<Metrics>>,
}

impl<O: OptimizationOracle> CycleEliminationSolver<O> {
    pub fn new(oracle: O, config: SolverConfig) -> Self {
        Self {
            oracle,
            config,
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Runs the loop to ACCEPT.
    ///
    /// # Errors
    /// - [`SolveError::Model`] when the graph has fewer than two nodes, is
    ///   disconnected, or cannot yield a model.
    /// - [`SolveError::Oracle`] when the oracle fails or answers with
    ///   something that is not a binary assignment over the model variables.
    /// - [`SolveError::EmptyResult`] when an acyclic candidate does not span
    ///   the graph.
    /// - [`SolveError::NonConvergence`] when the iteration bound runs out.
    pub fn solve(&mut self, graph: &WeightedGraph) -> Result<SolveOutcome, SolveError> {
        let result = self.run(graph);
        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(outcome) => {
                    metrics.solves_completed.inc();
                    metrics.last_solve_iterations.set(outcome.iterations as f64);
                }
                Err(_) => metrics.solves_failed.inc(),
            }
        }
        result
    }

    fn run(&mut self, graph: &WeightedGraph) -> Result<SolveOutcome, SolveError> {
        let started = Instant::now();
        if graph.node_count() < 2 {
            return Err(ModelError::TooFewNodes {
                node_count: graph.node_count(),
            }
            .into());
        }
        let components = graph.component_count();
        if components > 1 {
            return Err(ModelError::Disconnected { components }.into());
        }

        let bound = self.config.iteration_bound(graph.edge_count());
        let mut accumulated: Vec<CycleConstraint> = Vec::new();
        let mut history: Vec<IterationRecord> = Vec::new();

        tracing::info!(
            oracle = self.oracle.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            iteration_bound = bound,
            "cycle elimination started"
        );

        for iteration in 1..=bound {
            tracing::debug!(iteration, state = ?SolveState::Build, constraints = accumulated.len());
            let model = build_model(graph, &accumulated)?;

            tracing::debug!(
                iteration,
                state = ?SolveState::Solve,
                variables = model.variable_count()
            );
            let oracle_started = Instant::now();
            let answer = self.oracle.solve(&model);
            let oracle_elapsed = oracle_started.elapsed();
            // An answer that does not decode counts as a failed call.
            let decoded = answer.and_then(|assignment| model.decode(&assignment));
            self.record_oracle_call(oracle_elapsed, decoded.is_err());
            let bits = decoded.inspect_err(|error| {
                tracing::warn!(
                    iteration,
                    oracle = self.oracle.name(),
                    %error,
                    "oracle call failed"
                );
            })?;

            tracing::debug!(iteration, state = ?SolveState::Check);
            let candidate = model.selected_edges(&bits);
            let objective = model.objective_value(&bits);
            let cycles = cycle_basis(graph.node_count(), &candidate);

            tracing::info!(
                iteration,
                candidate = ?candidate,
                candidate_edges = candidate.len(),
                objective,
                cycles = cycles.len(),
                oracle_elapsed_ms = oracle_elapsed.as_millis(),
                "candidate checked"
            );

            if cycles.is_empty() {
                tracing::debug!(iteration, state = ?SolveState::Accept);
                let tree = AcceptedTree::validate(graph, candidate.clone())?;
                history.push(IterationRecord {
                    iteration,
                    candidate,
                    cycles: 0,
                    objective,
                    accumulated_constraints: accumulated.len(),
                    oracle_elapsed_ms: oracle_elapsed.as_millis(),
                    outcome: SolveState::Accept,
                });
                self.record_iteration(0);

                let elapsed = started.elapsed();
                tracing::info!(
                    iterations = iteration,
                    cycle_constraints = accumulated.len(),
                    total_weight = tree.total_weight(),
                    elapsed_ms = elapsed.as_millis(),
                    "spanning tree accepted"
                );
                return Ok(SolveOutcome {
                    tree,
                    iterations: iteration,
                    cycle_constraints: accumulated,
                    history,
                    elapsed,
                });
            }

            tracing::debug!(iteration, state = ?SolveState::Repair, new_constraints = cycles.len());
            let added = cycles.len();
            accumulated.extend(cycles.into_iter().map(CycleConstraint::from_cycle));
            self.record_iteration(added);
            history.push(IterationRecord {
                iteration,
                candidate,
                cycles: added,
                objective,
                accumulated_constraints: accumulated.len(),
                oracle_elapsed_ms: oracle_elapsed.as_millis(),
                outcome: SolveState::Repair,
            });
        }

        tracing::warn!(
            iterations = bound,
            cycle_constraints = accumulated.len(),
            "cycle elimination did not converge"
        );
        Err(SolveError::NonConvergence {
            iterations: bound,
            accumulated_constraints: accumulated.len(),
        })
    }

    fn record_oracle_call(&self, elapsed: Duration, failed: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.oracle_calls.inc();
            metrics.oracle_duration.observe(elapsed.as_secs_f64());
            if failed {
                metrics.oracle_failures.inc();
            }
        }
    }

    fn record_iteration(&self, added_constraints: usize) {
        if let Some(metrics) = &self.metrics {
            metrics.solver_iterations.inc();
            metrics.cycle_constraints.inc_by(added_constraints as f64);
        }
    }
}
