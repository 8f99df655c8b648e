//! QUBO modelling of the spanning-tree problem.
//!
//! One binary variable per undirected edge, a linear weight objective, and
//! the linear constraint families described on [`QuboModelBuilder`]. Models are
//! rebuilt from scratch on every solver iteration; nothing here is mutated
//! across oracle calls.

pub mod assignment;
pub mod builder;
pub mod cut;
pub mod model;
pub mod variables;

pub use assignment::Assignment;
pub use builder::{QuboModelBuilder, build_model};
pub use cut::CycleConstraint;
pub use model::{Constraint, LinearConstraint, QuadraticPenalty, QuboModel, Sense};
pub use variables::{VarId, VariableIndex, parse_variable_name};
