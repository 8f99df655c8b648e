use std::collections::BTreeMap;

use crate::error::OracleError;
use crate::graph::EdgeKey;

use super::model::QuboModel;
use super::variables::{VarId, variable_name};

/// Sparse variable -> value answer returned by an oracle.
///
/// Entries are raw indices and raw values; [`QuboModel::decode`] validates
/// them against a model. A variable without an entry means "not selected".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    values: BTreeMap<usize, f64>,
}

impl Assignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per bit, 1.0 for set bits and 0.0 otherwise.
    #[must_use]
    pub fn from_bits(bits: &[bool]) -> Self {
        Self {
            values: bits
                .iter()
                .enumerate()
                .map(|(index, &bit)| (index, if bit { 1.0 } else { 0.0 }))
                .collect(),
        }
    }

    /// Selects exactly the given edges of `model`.
    ///
    /// # Errors
    /// [`OracleError::UnknownVariableName`] when an edge has no variable in the model.
    pub fn from_edges(model: &QuboModel, edges: &[EdgeKey]) -> Result<Self, OracleError> {
        let mut assignment = Self::new();
        for &key in edges {
            let var = model
                .variables()
                .get(key)
                .ok_or_else(|| OracleError::UnknownVariableName(variable_name(key)))?;
            assignment.set(var, 1.0);
        }
        Ok(assignment)
    }

    /// Builds an assignment from `y_{u}_{v}`-named values, as produced by
    /// backends that speak variable names.
    ///
    /// # Errors
    /// [`OracleError::UnknownVariableName`] for names the model does not define.
    pub fn from_named<I, S>(model: &QuboModel, values: I) -> Result<Self, OracleError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut assignment = Self::new();
        for (name, value) in values {
            let name = name.as_ref();
            let var = model
                .variables()
                .lookup_name(name)
                .ok_or_else(|| OracleError::UnknownVariableName(name.to_string()))?;
            assignment.set(var, value);
        }
        Ok(assignment)
    }

    #[must_use]
    pub fn with(mut self, var: VarId, value: f64) -> Self {
        self.set(var, value);
        self
    }

    pub fn set(&mut self, var: VarId, value: f64) {
        self.values.insert(var.index(), value);
    }

    /// Value of `var`, 0.0 when absent.
    #[must_use]
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(&var.index()).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().map(|(&index, &value)| (index, value))
    }
}
