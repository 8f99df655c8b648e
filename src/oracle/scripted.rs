use std::collections::VecDeque;

use crate::error::OracleError;
use crate::graph::{EdgeKey, NodeId};
use crate::qubo::{Assignment, QuboModel};

use super::OptimizationOracle;

/// One pre-recorded oracle answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedAnswer {
    /// Select exactly these edges.
    Edges(Vec<EdgeKey>),
    /// Return this assignment untouched.
    Raw(Assignment),
    /// Fail the call.
    Fail(OracleError),
}

/// Deterministic oracle that replays a fixed answer sequence and records
/// every model it was given.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    answers: VecDeque<ScriptedAnswer>,
    models: Vec<QuboModel>,
}

impl ScriptedOracle {
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            models: Vec::new(),
        }
    }

    /// One answer per edge set, each edge given as a `(u, v)` pair.
    #[must_use]
    pub fn from_edge_sets<I, E>(sets: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        Self::new(sets.into_iter().map(|set| {
            ScriptedAnswer::Edges(set.into_iter().map(EdgeKey::from).collect())
        }))
    }

    /// Models received so far, in call order.
    #[must_use]
    pub fn models(&self) -> &[QuboModel] {
        &self.models
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl OptimizationOracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    fn solve(&mut self, model: &QuboModel) -> Result<Assignment, OracleError> {
        self.models.push(model.clone());
        let call = self.models.len();
        match self.answers.pop_front() {
            Some(ScriptedAnswer::Edges(edges)) => Assignment::from_edges(model, &edges),
            Some(ScriptedAnswer::Raw(assignment)) => Ok(assignment),
            Some(ScriptedAnswer::Fail(error)) => Err(error),
            None => Err(OracleError::ScriptExhausted { call }),
        }
    }
}
