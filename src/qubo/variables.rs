//! Bidirectional mapping between canonical edge keys and dense variable indices.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::ModelError;
use crate::graph::EdgeKey;

/// Dense index of an edge variable inside one [`VariableIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VarId(usize);

impl VarId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Exactly one variable per unordered edge. Variables are numbered in the
/// order their edges are inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableIndex {
    keys: Vec<EdgeKey>,
    ids: HashMap<EdgeKey, VarId>,
}

impl VariableIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a variable for `key`.
    ///
    /// # Errors
    /// Rejects self-loops and keys that already own a variable.
    pub fn insert(&mut self, key: EdgeKey) -> Result<VarId, ModelError> {
        if key.is_loop() {
            return Err(ModelError::SelfLoop { node: key.low() });
        }
        if self.ids.contains_key(&key) {
            return Err(ModelError::DuplicateEdge { edge: key });
        }
        let id = VarId(self.keys.len());
        self.keys.push(key);
        self.ids.insert(key, id);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, key: EdgeKey) -> Option<VarId> {
        self.ids.get(&key).copied()
    }

    #[must_use]
    pub fn key(&self, var: VarId) -> Option<EdgeKey> {
        self.keys.get(var.0).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, EdgeKey)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, &key)| (VarId(index), key))
    }

    /// External name of a variable, `y_{low}_{high}`.
    #[must_use]
    pub fn name(&self, var: VarId) -> Option<String> {
        self.key(var).map(variable_name)
    }

    /// Resolves an external `y_{u}_{v}` name back to its variable.
    #[must_use]
    pub fn lookup_name(&self, name: &str) -> Option<VarId> {
        parse_variable_name(name).and_then(|key| self.get(key))
    }
}

pub(crate) fn variable_name(key: EdgeKey) -> String {
    format!("y_{}_{}", key.low(), key.high())
}

/// Parses `y_{u}_{v}` into the canonical key of edge `(u, v)`.
#[must_use]
pub fn parse_variable_name(name: &str) -> Option<EdgeKey> {
    let rest = name.strip_prefix("y_")?;
    let (u, v) = rest.split_once('_')?;
    let key = EdgeKey::new(u.parse().ok()?, v.parse().ok()?);
    (!key.is_loop()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_order_independent_for_endpoints() {
        let mut index = VariableIndex::new();
        let first = index.insert(EdgeKey::new(3, 1)).expect("fresh edge");
        assert_eq!(index.get(EdgeKey::new(1, 3)), Some(first));
        assert_eq!(
            index.insert(EdgeKey::new(1, 3)),
            Err(ModelError::DuplicateEdge {
                edge: EdgeKey::new(1, 3)
            })
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn insert_rejects_self_loops() {
        let mut index = VariableIndex::new();
        assert_eq!(
            index.insert(EdgeKey::new(2, 2)),
            Err(ModelError::SelfLoop { node: 2 })
        );
        assert!(index.is_empty());
    }

    #[test]
    fn names_round_trip_through_lookup() {
        let mut index = VariableIndex::new();
        let var = index.insert(EdgeKey::new(7, 2)).expect("fresh edge");
        assert_eq!(index.name(var).as_deref(), Some("y_2_7"));
        assert_eq!(index.lookup_name("y_7_2"), Some(var));
        assert_eq!(index.lookup_name("y_2_8"), None);
    }

    #[test]
    fn parse_variable_name_rejects_garbage() {
        assert_eq!(parse_variable_name("y_0_4"), Some(EdgeKey::new(0, 4)));
        assert_eq!(parse_variable_name("x_0_4"), None);
        assert_eq!(parse_variable_name("y_0"), None);
        assert_eq!(parse_variable_name("y_a_1"), None);
        assert_eq!(parse_variable_name("y_3_3"), None);
    }
}
