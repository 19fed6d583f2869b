use crate::config::ObjectiveWeights;
use crate::params::Parameters;
use crate::roster::{TeamId, Week};
use crate::variables::VariableSet;

/// Cost of selecting `x[home, away, week]`: weighted squared travel distance
/// minus weighted attractiveness.
///
/// Squaring makes one long trip cost more than two medium trips of the same
/// total length.
pub fn fixture_cost(params: &Parameters, weights: &ObjectiveWeights, home: TeamId, away: TeamId, week: Week) -> f64 {
    let d = params.distance(home, away);
    weights.distance * d * d - weights.attractiveness * params.attractiveness(home, away, week)
}

/// Dense objective coefficients (minimize) in variable order
pub fn objective_coefficients(vars: &VariableSet, params: &Parameters, weights: &ObjectiveWeights) -> Vec<f64> {
    (0..vars.len())
        .map(|index| {
            let (i, j, k) = vars.triple(index);
            fixture_cost(params, weights, i, j, k)
        })
        .collect()
}
