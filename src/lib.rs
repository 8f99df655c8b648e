#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

pub mod classification;
pub mod config;
pub mod error;
pub mod graph;
pub mod observability;
pub mod oracle;
pub mod pipeline;
pub mod qubo;
pub mod solver;

pub use config::Config;
pub use error::{ModelError, OracleError, PipelineError, SelectionError, SolveError};
pub use graph::{Edge, EdgeKey, NodeId, WeightedGraph};
pub use pipeline::{MstPipeline, PipelineReport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
