use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classification::PrototypeStrategy;
use crate::graph::MAX_NODES;
use crate::observability::LogFormat;
use crate::oracle::{OracleKind, OracleSettings, exhaustive::MAX_EXHAUSTIVE_VARIABLES};
use crate::solver::SolverConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

#[derive(Parser, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[command(name = "qubo-mst", author, version, about, long_about = None)]
pub struct Config {
    /// JSON graph document; the built-in demo graph is used when omitted
    #[arg(long, env = "QUBO_MST_GRAPH")]
    pub graph: Option<PathBuf>,

    /// Generate a random graph with this many nodes instead of reading one
    #[arg(long, env = "QUBO_MST_RANDOM_NODES", conflicts_with = "graph")]
    pub random_nodes: Option<usize>,

    /// Optimisation backend
    #[arg(long, env = "QUBO_MST_ORACLE", default_value = "exhaustive")]
    pub oracle: OracleKind,

    /// Prototype selection strategy
    #[arg(long, env = "QUBO_MST_STRATEGY", default_value = "auto")]
    pub strategy: PrototypeStrategy,

    /// Cap on cycle-elimination iterations (defaults to edges squared)
    #[arg(long, env = "QUBO_MST_MAX_ITERATIONS")]
    pub max_iterations: Option<usize>,

    /// Per-call oracle time budget in milliseconds
    #[arg(long, env = "QUBO_MST_ORACLE_TIMEOUT_MS", default_value = "30000")]
    pub oracle_timeout_ms: u64,

    /// Seed for the annealing backend and random graph generation
    #[arg(long, env = "QUBO_MST_SEED", default_value = "42")]
    pub seed: u64,

    /// Annealing sweeps per restart
    #[arg(long, env = "QUBO_MST_SWEEPS", default_value = "2000")]
    pub sweeps: usize,

    /// Annealing restarts per oracle call
    #[arg(long, env = "QUBO_MST_RESTARTS", default_value = "8")]
    pub restarts: usize,

    /// Largest model the exhaustive backend will enumerate
    #[arg(long, env = "QUBO_MST_EXHAUSTIVE_LIMIT", default_value = "22")]
    pub exhaustive_limit: usize,

    /// Log output format
    #[arg(long, env = "QUBO_MST_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long, env = "QUBO_MST_PRINT_METRICS")]
    pub print_metrics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph: None,
            random_nodes: None,
            oracle: OracleKind::Exhaustive,
            strategy: PrototypeStrategy::Auto,
            max_iterations: None,
            oracle_timeout_ms: 30_000,
            seed: 42,
            sweeps: 2000,
            restarts: 8,
            exhaustive_limit: 22,
            log_format: LogFormat::Text,
            print_metrics: false,
        }
    }
}

impl Config {
    /// Parses CLI arguments (with env fallbacks) and validates the result.
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = Config::try_parse_from(args)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oracle_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "Oracle timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_iterations == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "Max iterations must be greater than 0".to_string(),
            ));
        }

        if self.sweeps == 0 || self.restarts == 0 {
            return Err(ConfigError::InvalidConfig(
                "Annealing sweeps and restarts must be greater than 0".to_string(),
            ));
        }

        if self.exhaustive_limit > MAX_EXHAUSTIVE_VARIABLES {
            return Err(ConfigError::InvalidConfig(format!(
                "Exhaustive limit ({}) must not exceed {MAX_EXHAUSTIVE_VARIABLES}",
                self.exhaustive_limit
            )));
        }

        if let Some(nodes) = self.random_nodes {
            if !(2..=MAX_NODES).contains(&nodes) {
                return Err(ConfigError::InvalidConfig(format!(
                    "Random graphs need between 2 and {MAX_NODES} nodes, got {nodes}"
                )));
            }
        }

        Ok(())
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn oracle_settings(&self) -> OracleSettings {
        OracleSettings {
            kind: self.oracle,
            timeout: self.oracle_timeout(),
            seed: self.seed,
            sweeps: self.sweeps,
            restarts: self.restarts,
            exhaustive_limit: self.exhaustive_limit,
        }
    }

    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            max_iterations: self.max_iterations,
        }
    }
}
