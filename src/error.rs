//! Error taxonomy shared by model building, the oracle boundary, the solve
//! loop and classification.

use std::time::Duration;

use thiserror::Error;

use crate::graph::{EdgeKey, NodeId};

/// Malformed graph or model input. Detected at BUILD and fatal for the solve.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    #[error("self-loop on node {node}")]
    SelfLoop { node: NodeId },
    #[error("duplicate edge {edge}")]
    DuplicateEdge { edge: EdgeKey },
    #[error("edge {edge} references node outside 0..{node_count}")]
    NodeOutOfRange { edge: EdgeKey, node_count: usize },
    #[error("graph needs {node_count} nodes, above the limit of {limit}")]
    TooManyNodes { node_count: usize, limit: usize },
    #[error("a spanning tree needs at least two nodes, graph has {node_count}")]
    TooFewNodes { node_count: usize },
    #[error("edge {edge} has invalid weight {weight}; weights must be finite and positive")]
    InvalidWeight { edge: EdgeKey, weight: f64 },
    #[error("constraint references edge {edge} which is not part of the graph")]
    UnknownEdge { edge: EdgeKey },
    #[error("graph is disconnected ({components} components); no spanning tree exists")]
    Disconnected { components: usize },
    #[error("expected {expected} class labels, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },
    #[error("variables must be configured before {step}")]
    VariablesNotConfigured { step: &'static str },
}

/// Failure of, or invalid answer from, an optimization oracle.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OracleError {
    #[error("oracle backend failed: {0}")]
    Backend(String),
    #[error("oracle exceeded its time budget of {budget:?} (elapsed {elapsed:?})")]
    Timeout { budget: Duration, elapsed: Duration },
    #[error("assignment references unknown variable index {index} (model has {variable_count})")]
    UnknownVariable { index: usize, variable_count: usize },
    #[error("assignment value {value} for variable {name} is not binary")]
    NonBinaryValue { name: String, value: f64 },
    #[error("assignment references unknown variable name {0:?}")]
    UnknownVariableName(String),
    #[error("no assignment satisfies the model constraints")]
    Infeasible,
    #[error("model has {variables} variables, above the backend limit of {limit}")]
    ProblemTooLarge { variables: usize, limit: usize },
    #[error("scripted oracle has no answer left for call {call}")]
    ScriptExhausted { call: usize },
}

/// Errors produced by the cycle-elimination solve loop.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(
        "no acyclic candidate after {iterations} iterations ({accumulated_constraints} cycle constraints accumulated)"
    )]
    NonConvergence {
        iterations: usize,
        accumulated_constraints: usize,
    },
    #[error("oracle answer is not a spanning tree: {reason}")]
    EmptyResult { reason: String },
}

/// Errors raised while choosing prototypes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("class-driven selection requires per-node class labels")]
    MissingLabels,
    #[error("no prototype could be selected from the accepted tree")]
    NoPrototypes,
}

/// Top-level error of the solve + classify pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl From<ModelError> for PipelineError {
    fn from(error: ModelError) -> Self {
        Self::Solve(SolveError::Model(error))
    }
}
