//! Optimisation oracles: anything that turns a [`QuboModel`] into an
//! [`Assignment`]. Backends may be exact, heuristic or stochastic; the solver
//! only relies on the shape of the answer.

pub mod annealing;
pub mod budget;
pub mod exhaustive;
pub mod scripted;

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::OracleError;
use crate::qubo::{Assignment, QuboModel};

pub use annealing::AnnealingOracle;
pub use budget::TimeBudget;
pub use exhaustive::ExhaustiveOracle;
pub use scripted::{ScriptedAnswer, ScriptedOracle};

/// A single blocking `solve` call per solver iteration.
///
/// Implementations own their time budget and report overruns as
/// [`OracleError::Timeout`]; the solver does not retry.
pub trait OptimizationOracle {
    /// Backend name used in logs.
    fn name(&self) -> &str;

    /// # Errors
    /// Any [`OracleError`] the backend raises.
    fn solve(&mut self, model: &QuboModel) -> Result<Assignment, OracleError>;
}

impl<O: OptimizationOracle + ?Sized> OptimizationOracle for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, model: &QuboModel) -> Result<Assignment, OracleError> {
        (**self).solve(model)
    }
}

impl<O: OptimizationOracle + ?Sized> OptimizationOracle for &mut O {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&mut self, model: &QuboModel) -> Result<Assignment, OracleError> {
        (**self).solve(model)
    }
}

/// Backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    /// Exact enumeration of every assignment (small models only)
    #[default]
    Exhaustive,
    /// Seeded simulated annealing on the penalised energy
    Annealing,
}

/// Explicit backend configuration, passed to the oracle constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleSettings {
    pub kind: OracleKind,
    pub timeout: Duration,
    pub seed: u64,
    pub sweeps: usize,
    pub restarts: usize,
    pub exhaustive_limit: usize,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            kind: OracleKind::Exhaustive,
            timeout: Duration::from_secs(30),
            seed: 42,
            sweeps: 2000,
            restarts: 8,
            exhaustive_limit: 22,
        }
    }
}

/// Instantiates the configured backend.
#[must_use]
pub fn build_oracle(settings: &OracleSettings) -> Box<dyn OptimizationOracle> {
    match settings.kind {
        OracleKind::Exhaustive => Box::new(ExhaustiveOracle::new(
            settings.exhaustive_limit,
            settings.timeout,
        )),
        OracleKind::Annealing => Box::new(AnnealingOracle::new(
            settings.seed,
            settings.sweeps,
            settings.restarts,
            settings.timeout,
        )),
    }
}
