use std::collections::BTreeMap;

use kickoff_solver::MipProblem;
use log::debug;

use crate::config::ScheduleConfig;
use crate::constraints::{ConstraintFamily, FixtureConstraint, build_constraints, family_counts};
use crate::objective::objective_coefficients;
use crate::params::Parameters;
use crate::variables::VariableSet;

/// A complete schedule model: variables, constraints and objective.
///
/// Built once per run from validated [`Parameters`]; lowering to a
/// [`MipProblem`] copies, so the model is never mutated by a solve.
#[derive(Debug, Clone)]
pub struct FixtureModel {
    pub variables: VariableSet,
    pub constraints: Vec<FixtureConstraint>,
    pub objective: Vec<f64>,
}

impl FixtureModel {
    pub fn build(params: &Parameters, config: &ScheduleConfig) -> Self {
        let variables = VariableSet::new(params.teams(), params.weeks());
        let constraints = build_constraints(&variables, params, config);
        let objective = objective_coefficients(&variables, params, &config.weights);

        debug!(
            "built model: {} teams, {} weeks, {} variables, {} constraints",
            params.teams(),
            params.weeks(),
            variables.len(),
            constraints.len()
        );
        Self {
            variables,
            constraints,
            objective,
        }
    }

    pub fn family_counts(&self) -> BTreeMap<ConstraintFamily, usize> {
        family_counts(&self.constraints)
    }

    pub fn to_problem(&self) -> MipProblem {
        let mut problem = MipProblem::new(self.variables.names());
        problem.set_objective(self.objective.clone(), true);
        for c in &self.constraints {
            problem.add_constraint(c.name(), c.terms.clone(), c.relation, c.bound);
        }
        problem
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::attractiveness::attractiveness_scores;
    use crate::distance::DistanceMatrix;
    use crate::roster::{Roster, TeamId};

    #[test]
    fn test_lowering_keeps_everything() {
        let roster = Roster::new(["A", "B", "C", "D"]).unwrap();
        let mut distances = DistanceMatrix::new();
        for i in roster.ids() {
            for j in roster.ids() {
                distances.insert((i, j), if i == j { 0.0 } else { 10.0 });
            }
        }
        let ranks: BTreeMap<TeamId, u32> = roster.ids().map(|i| (i, 1)).collect();
        let scores = attractiveness_scores(&roster, &ranks, 6).unwrap();
        let params = Parameters::new(&roster, 6, &distances, &scores, &BTreeSet::new()).unwrap();

        let model = FixtureModel::build(&params, &ScheduleConfig::default());
        let problem = model.to_problem();

        assert_eq!(problem.num_variables(), 96);
        assert_eq!(problem.num_constraints(), model.constraints.len());
        assert_eq!(problem.variables[model.variables.index(2, 3, 4)], "x_2_3_4");
        assert_eq!(problem.constraints[0].name, "single_fixture[1,2]");
        assert!(problem.objective.minimize);
        assert_eq!(problem.objective.coefficients[model.variables.index(1, 2, 1)], 100.0);
        assert!(problem.validate().is_ok());
    }
}
