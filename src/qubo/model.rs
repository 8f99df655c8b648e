use std::fmt;

use serde::Serialize;

use crate::error::OracleError;
use crate::graph::EdgeKey;

use super::assignment::Assignment;
use super::variables::{VarId, VariableIndex};

const BINARY_TOLERANCE: f64 = 1e-6;
const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Comparison operator of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    Eq,
    Le,
    Ge,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "==",
            Self::Le => "<=",
            Self::Ge => ">=",
        })
    }
}

/// `Σ coefficient · x  (sense)  rhs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    #[must_use]
    pub fn lhs(&self, bits: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(var, _)| bits.get(var.index()).copied().unwrap_or(false))
            .map(|(_, coefficient)| coefficient)
            .sum()
    }

    /// Distance from satisfaction; zero when the constraint holds.
    #[must_use]
    pub fn violation(&self, bits: &[bool]) -> f64 {
        let lhs = self.lhs(bits);
        match self.sense {
            Sense::Eq => (lhs - self.rhs).abs(),
            Sense::Le => (lhs - self.rhs).max(0.0),
            Sense::Ge => (self.rhs - lhs).max(0.0),
        }
    }

    #[must_use]
    pub fn is_satisfied(&self, bits: &[bool]) -> bool {
        self.violation(bits) <= FEASIBILITY_TOLERANCE
    }
}

/// Penalty charged when both variables of the pair are selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadraticPenalty {
    pub name: String,
    pub pair: (VarId, VarId),
    pub coefficient: f64,
}

impl QuadraticPenalty {
    #[must_use]
    pub fn value(&self, bits: &[bool]) -> f64 {
        let selected = |var: VarId| bits.get(var.index()).copied().unwrap_or(false);
        if selected(self.pair.0) && selected(self.pair.1) {
            self.coefficient
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Constraint {
    Linear(LinearConstraint),
    Quadratic(QuadraticPenalty),
}

impl Constraint {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Linear(linear) => &linear.name,
            Self::Quadratic(quadratic) => &quadratic.name,
        }
    }
}

/// Immutable optimisation model handed to an oracle.
///
/// Minimise `Σ objective[i] · x_i + Σ quadratic penalties` subject to every
/// linear constraint, with `x` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct QuboModel {
    variables: VariableIndex,
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

impl QuboModel {
    pub(crate) fn from_parts(
        variables: VariableIndex,
        objective: Vec<f64>,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            variables,
            objective,
            constraints,
        }
    }

    #[must_use]
    pub fn variables(&self) -> &VariableIndex {
        &self.variables
    }

    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Linear objective coefficients indexed by [`VarId::index`].
    #[must_use]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn linear_constraints(&self) -> impl Iterator<Item = &LinearConstraint> + '_ {
        self.constraints.iter().filter_map(|constraint| match constraint {
            Constraint::Linear(linear) => Some(linear),
            Constraint::Quadratic(_) => None,
        })
    }

    pub fn quadratic_penalties(&self) -> impl Iterator<Item = &QuadraticPenalty> + '_ {
        self.constraints.iter().filter_map(|constraint| match constraint {
            Constraint::Quadratic(quadratic) => Some(quadratic),
            Constraint::Linear(_) => None,
        })
    }

    #[must_use]
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name() == name)
    }

    /// Coerces an oracle answer into one bit per variable.
    ///
    /// Variables absent from the assignment are read as 0.
    ///
    /// # Errors
    /// [`OracleError::UnknownVariable`] for indices outside the model and
    /// [`OracleError::NonBinaryValue`] for values that are not 0 or 1.
    pub fn decode(&self, assignment: &Assignment) -> Result<Vec<bool>, OracleError> {
        let mut bits = vec![false; self.variable_count()];
        for (index, value) in assignment.iter() {
            let Some(bit) = bits.get_mut(index) else {
                return Err(OracleError::UnknownVariable {
                    index,
                    variable_count: self.variable_count(),
                });
            };
            *bit = if value.abs() <= BINARY_TOLERANCE {
                false
            } else if (value - 1.0).abs() <= BINARY_TOLERANCE {
                true
            } else {
                return Err(OracleError::NonBinaryValue {
                    name: self
                        .variables
                        .name(VarId::new(index))
                        .unwrap_or_else(|| format!("#{index}")),
                    value,
                });
            };
        }
        Ok(bits)
    }

    /// Edges whose variable is set, in variable order.
    #[must_use]
    pub fn selected_edges(&self, bits: &[bool]) -> Vec<EdgeKey> {
        self.variables
            .iter()
            .filter(|(var, _)| bits.get(var.index()).copied().unwrap_or(false))
            .map(|(_, key)| key)
            .collect()
    }

    #[must_use]
    pub fn objective_value(&self, bits: &[bool]) -> f64 {
        self.objective
            .iter()
            .zip(bits)
            .filter(|(_, selected)| **selected)
            .map(|(coefficient, _)| coefficient)
            .sum()
    }

    #[must_use]
    pub fn penalty_value(&self, bits: &[bool]) -> f64 {
        self.quadratic_penalties().map(|p| p.value(bits)).sum()
    }

    /// Total linear constraint violation.
    #[must_use]
    pub fn violation(&self, bits: &[bool]) -> f64 {
        self.linear_constraints().map(|c| c.violation(bits)).sum()
    }

    #[must_use]
    pub fn is_feasible(&self, bits: &[bool]) -> bool {
        self.linear_constraints().all(|c| c.is_satisfied(bits))
    }

    /// Objective plus quadratic penalties plus `penalty_weight` times the
    /// linear violation. This is the unconstrained energy penalty-based
    /// backends minimise.
    #[must_use]
    pub fn penalized_energy(&self, bits: &[bool], penalty_weight: f64) -> f64 {
        self.objective_value(bits)
            + self.penalty_value(bits)
            + penalty_weight * self.violation(bits)
    }

    /// A penalty weight large enough that any violation outweighs the whole
    /// objective range.
    #[must_use]
    pub fn default_penalty_weight(&self) -> f64 {
        1.0 + self.objective.iter().map(|c| c.abs()).sum::<f64>()
            + self
                .quadratic_penalties()
                .map(|p| p.coefficient.abs())
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_variable_model() -> QuboModel {
        let mut variables = VariableIndex::new();
        let a = variables.insert(EdgeKey::new(0, 1)).expect("fresh");
        let b = variables.insert(EdgeKey::new(1, 2)).expect("fresh");
        QuboModel::from_parts(
            variables,
            vec![2.0, 3.0],
            vec![
                Constraint::Linear(LinearConstraint {
                    name: "at_most_one".into(),
                    terms: vec![(a, 1.0), (b, 1.0)],
                    sense: Sense::Le,
                    rhs: 1.0,
                }),
                Constraint::Quadratic(QuadraticPenalty {
                    name: "pair".into(),
                    pair: (a, b),
                    coefficient: 10.0,
                }),
            ],
        )
    }

    #[test]
    fn decode_defaults_missing_variables_to_zero() {
        let model = two_variable_model();
        let assignment = Assignment::new().with(VarId::new(1), 1.0);
        assert_eq!(model.decode(&assignment), Ok(vec![false, true]));
    }

    #[test]
    fn decode_rejects_unknown_and_non_binary_values() {
        let model = two_variable_model();

        let unknown = Assignment::new().with(VarId::new(5), 1.0);
        assert_eq!(
            model.decode(&unknown),
            Err(OracleError::UnknownVariable {
                index: 5,
                variable_count: 2
            })
        );

        let fractional = Assignment::new().with(VarId::new(0), 0.4);
        assert!(matches!(
            model.decode(&fractional),
            Err(OracleError::NonBinaryValue { ref name, .. }) if name == "y_0_1"
        ));
    }

    #[test]
    fn energy_combines_objective_penalty_and_violation() {
        let model = two_variable_model();
        let both = [true, true];
        assert!((model.objective_value(&both) - 5.0).abs() < f64::EPSILON);
        assert!((model.penalty_value(&both) - 10.0).abs() < f64::EPSILON);
        assert!((model.violation(&both) - 1.0).abs() < f64::EPSILON);
        assert!(!model.is_feasible(&both));
        assert!((model.penalized_energy(&both, 100.0) - 115.0).abs() < f64::EPSILON);

        let one = [true, false];
        assert!(model.is_feasible(&one));
        assert!((model.penalized_energy(&one, 100.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_penalty_weight_dominates_objective() {
        let model = two_variable_model();
        assert!((model.default_penalty_weight() - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn selected_edges_follow_variable_order() {
        let model = two_variable_model();
        assert_eq!(
            model.selected_edges(&[true, true]),
            vec![EdgeKey::new(0, 1), EdgeKey::new(1, 2)]
        );
    }
}
