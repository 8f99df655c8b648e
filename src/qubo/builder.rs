use crate::error::ModelError;
use crate::graph::{EdgeKey, WeightedGraph};

use super::cut::CycleConstraint;
use super::model::{Constraint, LinearConstraint, QuadraticPenalty, QuboModel, Sense};
use super::variables::{VarId, VariableIndex};

/// Builds a [`QuboModel`] for one solver iteration.
///
/// Constraint families added by [`QuboModelBuilder::add_constraints`]:
/// 1. `edge_count`: `Σ y = n - 1`
/// 2. `connectivity_{v}`: `Σ_{e ∋ v} y_e >= 1` for every node
/// 3. `degree_{v}`: `Σ_{e ∋ v} y_e <= n - 1` for every node
/// 4. `cycle_cut_{k}`: every accumulated [`CycleConstraint`], verbatim
///
/// None of 1–3 forbids cycles; that is left to the cuts.
#[derive(Debug)]
pub struct QuboModelBuilder<'g> {
    graph: &'g WeightedGraph,
    variables: Option<VariableIndex>,
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

impl<'g> QuboModelBuilder<'g> {
    #[must_use]
    pub fn new(graph: &'g WeightedGraph) -> Self {
        Self {
            graph,
            variables: None,
            objective: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Allocates one variable per edge, in graph edge order.
    ///
    /// # Errors
    /// [`ModelError::SelfLoop`] or [`ModelError::DuplicateEdge`] if the graph
    /// is not simple.
    pub fn configure_variables(&mut self) -> Result<&mut Self, ModelError> {
        let mut variables = VariableIndex::new();
        for edge in self.graph.edges() {
            variables.insert(edge.key)?;
        }
        self.objective = vec![0.0; variables.len()];
        self.variables = Some(variables);
        Ok(self)
    }

    /// Sets each variable's objective coefficient to its edge weight.
    ///
    /// # Errors
    /// [`ModelError::VariablesNotConfigured`] when called before
    /// [`QuboModelBuilder::configure_variables`].
    pub fn define_objective(&mut self) -> Result<&mut Self, ModelError> {
        let variables = self.variables("define_objective")?;
        let mut objective = vec![0.0; variables.len()];
        for edge in self.graph.edges() {
            if let Some(var) = variables.get(edge.key) {
                objective[var.index()] = edge.weight;
            }
        }
        self.objective = objective;
        Ok(self)
    }

    /// Adds the structural constraints and re-adds every accumulated cut.
    ///
    /// # Errors
    /// [`ModelError::VariablesNotConfigured`] when variables are missing, and
    /// [`ModelError::UnknownEdge`] when a cut names an edge outside the graph.
    pub fn add_constraints(
        &mut self,
        cycle_constraints: &[CycleConstraint],
    ) -> Result<&mut Self, ModelError> {
        let variables = self.variables("add_constraints")?;
        let node_count = self.graph.node_count();
        let tree_size = node_count.saturating_sub(1) as f64;
        let mut constraints = Vec::with_capacity(1 + 2 * node_count + cycle_constraints.len());

        constraints.push(Constraint::Linear(LinearConstraint {
            name: "edge_count".to_string(),
            terms: variables.iter().map(|(var, _)| (var, 1.0)).collect(),
            sense: Sense::Eq,
            rhs: tree_size,
        }));

        for node in 0..node_count {
            let incident: Vec<(VarId, f64)> = self
                .graph
                .incident_edges(node)
                .filter_map(|edge| variables.get(edge.key))
                .map(|var| (var, 1.0))
                .collect();

            constraints.push(Constraint::Linear(LinearConstraint {
                name: format!("connectivity_{node}"),
                terms: incident.clone(),
                sense: Sense::Ge,
                rhs: 1.0,
            }));
            constraints.push(Constraint::Linear(LinearConstraint {
                name: format!("degree_{node}"),
                terms: incident,
                sense: Sense::Le,
                rhs: tree_size,
            }));
        }

        for (k, cut) in cycle_constraints.iter().enumerate() {
            let terms = cut
                .edges()
                .iter()
                .map(|&key| {
                    variables
                        .get(key)
                        .map(|var| (var, 1.0))
                        .ok_or(ModelError::UnknownEdge { edge: key })
                })
                .collect::<Result<Vec<_>, _>>()?;
            constraints.push(Constraint::Linear(LinearConstraint {
                name: format!("cycle_cut_{k}"),
                terms,
                sense: Sense::Le,
                rhs: cut.bound() as f64,
            }));
        }

        self.constraints.extend(constraints);
        Ok(self)
    }

    /// Adds a quadratic penalty charged when both edges are selected.
    ///
    /// # Errors
    /// [`ModelError::VariablesNotConfigured`] or [`ModelError::UnknownEdge`].
    pub fn add_pair_penalty(
        &mut self,
        first: EdgeKey,
        second: EdgeKey,
        coefficient: f64,
    ) -> Result<&mut Self, ModelError> {
        let variables = self.variables("add_pair_penalty")?;
        let a = variables
            .get(first)
            .ok_or(ModelError::UnknownEdge { edge: first })?;
        let b = variables
            .get(second)
            .ok_or(ModelError::UnknownEdge { edge: second })?;
        self.constraints
            .push(Constraint::Quadratic(QuadraticPenalty {
                name: format!("pair_{}_{}", a.index(), b.index()),
                pair: (a, b),
                coefficient,
            }));
        Ok(self)
    }

    /// Finishes the model.
    ///
    /// # Errors
    /// [`ModelError::VariablesNotConfigured`] if no variables were configured.
    pub fn build(self) -> Result<QuboModel, ModelError> {
        let variables = self
            .variables
            .ok_or(ModelError::VariablesNotConfigured { step: "build" })?;
        Ok(QuboModel::from_parts(
            variables,
            self.objective,
            self.constraints,
        ))
    }

    fn variables(&self, step: &'static str) -> Result<&VariableIndex, ModelError> {
        self.variables
            .as_ref()
            .ok_or(ModelError::VariablesNotConfigured { step })
    }
}

/// Runs every builder step: variables, objective, constraints and cuts.
///
/// # Errors
/// Any [`ModelError`] raised by the individual steps.
pub fn build_model(
    graph: &WeightedGraph,
    cycle_constraints: &[CycleConstraint],
) -> Result<QuboModel, ModelError> {
    let mut builder = QuboModelBuilder::new(graph);
    builder
        .configure_variables()?
        .define_objective()?
        .add_constraints(cycle_constraints)?;
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_graph() -> WeightedGraph {
        WeightedGraph::from_edges([
            (0, 1, 2.0),
            (0, 2, 3.0),
            (1, 2, 1.0),
            (1, 3, 4.0),
            (2, 3, 5.0),
            (2, 4, 2.0),
            (3, 4, 1.0),
        ])
        .expect("valid graph")
    }

    fn linear<'m>(model: &'m QuboModel, name: &str) -> &'m LinearConstraint {
        match model.constraint(name) {
            Some(Constraint::Linear(linear)) => linear,
            other => panic!("expected linear constraint {name}, got {other:?}"),
        }
    }

    #[test]
    fn one_variable_per_edge_with_weight_objective() {
        let graph = scenario_graph();
        let model = build_model(&graph, &[]).expect("model builds");

        assert_eq!(model.variable_count(), 7);
        let var = model
            .variables()
            .get(EdgeKey::new(4, 3))
            .expect("edge has a variable");
        assert!((model.objective()[var.index()] - 1.0).abs() < f64::EPSILON);
        assert_eq!(model.quadratic_penalties().count(), 0);
    }

    #[test]
    fn structural_constraints_are_present() {
        let graph = scenario_graph();
        let model = build_model(&graph, &[]).expect("model builds");

        // edge count + (connectivity + degree) per node
        assert_eq!(model.constraints().len(), 1 + 2 * 5);

        let edge_count = linear(&model, "edge_count");
        assert_eq!(edge_count.sense, Sense::Eq);
        assert!((edge_count.rhs - 4.0).abs() < f64::EPSILON);
        assert_eq!(edge_count.terms.len(), 7);

        let connectivity = linear(&model, "connectivity_2");
        assert_eq!(connectivity.sense, Sense::Ge);
        assert_eq!(connectivity.terms.len(), 4);

        let degree = linear(&model, "degree_0");
        assert_eq!(degree.sense, Sense::Le);
        assert!((degree.rhs - 4.0).abs() < f64::EPSILON);
        assert_eq!(degree.terms.len(), 2);
    }

    #[test]
    fn cycle_cuts_are_re_added_verbatim() {
        let graph = scenario_graph();
        let cut = CycleConstraint::from_cycle(vec![
            EdgeKey::new(0, 1),
            EdgeKey::new(1, 2),
            EdgeKey::new(0, 2),
        ]);
        let model = build_model(&graph, &[cut.clone(), cut]).expect("model builds");

        for name in ["cycle_cut_0", "cycle_cut_1"] {
            let constraint = linear(&model, name);
            assert_eq!(constraint.sense, Sense::Le);
            assert!((constraint.rhs - 2.0).abs() < f64::EPSILON);
            assert_eq!(constraint.terms.len(), 3);
        }
    }

    #[test]
    fn cut_with_unknown_edge_is_a_model_error() {
        let graph = scenario_graph();
        let cut = CycleConstraint::from_cycle(vec![EdgeKey::new(0, 4), EdgeKey::new(0, 1)]);
        assert_eq!(
            build_model(&graph, &[cut]),
            Err(ModelError::UnknownEdge {
                edge: EdgeKey::new(0, 4)
            })
        );
    }

    #[test]
    fn steps_require_configured_variables() {
        let graph = scenario_graph();
        let mut builder = QuboModelBuilder::new(&graph);
        assert_eq!(
            builder.define_objective().map(|_| ()),
            Err(ModelError::VariablesNotConfigured {
                step: "define_objective"
            })
        );
        assert!(matches!(
            QuboModelBuilder::new(&graph).build(),
            Err(ModelError::VariablesNotConfigured { step: "build" })
        ));
    }

    #[test]
    fn pair_penalty_becomes_quadratic_term() {
        let graph = scenario_graph();
        let mut builder = QuboModelBuilder::new(&graph);
        builder
            .configure_variables()
            .and_then(|b| b.add_pair_penalty(EdgeKey::new(0, 1), EdgeKey::new(1, 2), 5.0))
            .expect("pair penalty added");
        let model = builder.build().expect("model builds");

        let penalty = model.quadratic_penalties().next().expect("one penalty");
        assert!((penalty.coefficient - 5.0).abs() < f64::EPSILON);
        assert_eq!(model.linear_constraints().count(), 0);
    }

    #[test]
    fn rebuilding_is_a_pure_function_of_inputs() {
        let graph = scenario_graph();
        let cut = CycleConstraint::from_cycle(vec![
            EdgeKey::new(2, 4),
            EdgeKey::new(3, 4),
            EdgeKey::new(2, 3),
        ]);
        assert_eq!(
            build_model(&graph, std::slice::from_ref(&cut)),
            build_model(&graph, std::slice::from_ref(&cut))
        );
    }
}
