use serde::Serialize;

use crate::graph::EdgeKey;

/// Cutting plane derived from one cycle of a rejected candidate:
/// `Σ_{e ∈ cycle} y_e <= |cycle| - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CycleConstraint {
    edges: Vec<EdgeKey>,
}

impl CycleConstraint {
    /// The edges are stored sorted so equal cycles compare equal.
    #[must_use]
    pub fn from_cycle(mut edges: Vec<EdgeKey>) -> Self {
        edges.sort_unstable();
        edges.dedup();
        Self { edges }
    }

    #[must_use]
    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Right-hand side of the `<=` constraint.
    #[must_use]
    pub fn bound(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_bound_is_two() {
        let cut = CycleConstraint::from_cycle(vec![
            EdgeKey::new(2, 0),
            EdgeKey::new(1, 2),
            EdgeKey::new(0, 1),
        ]);
        assert_eq!(cut.len(), 3);
        assert_eq!(cut.bound(), 2);
        assert_eq!(cut.edges()[0], EdgeKey::new(0, 1));
    }

    #[test]
    fn edge_order_does_not_matter() {
        let a = CycleConstraint::from_cycle(vec![EdgeKey::new(0, 1), EdgeKey::new(1, 2)]);
        let b = CycleConstraint::from_cycle(vec![EdgeKey::new(2, 1), EdgeKey::new(1, 0)]);
        assert_eq!(a, b);
    }
}
