use std::collections::BTreeMap;

use kickoff_solver::{SolveOutcome, Solver};
use log::info;

use crate::attractiveness::attractiveness_scores;
use crate::builder::FixtureModel;
use crate::config::ScheduleConfig;
use crate::distance::{DistanceMatrix, conflict_pairs};
use crate::error::ModelError;
use crate::params::Parameters;
use crate::roster::{Roster, TeamId};
use crate::schedule::Schedule;

/// Everything the optimizer consumes for one season
#[derive(Debug, Clone)]
pub struct LeagueInput {
    pub roster: Roster,
    pub distances: DistanceMatrix,
    pub ranks: BTreeMap<TeamId, u32>,
}

/// Result of one optimization run
#[derive(Debug, Clone)]
pub struct SeasonPlan {
    pub parameters: Parameters,
    pub outcome: SolveOutcome,
    /// Present when the solver produced an assignment
    pub schedule: Option<Schedule>,
}

/// Validate the inputs and build the model without solving it
pub fn prepare(input: &LeagueInput, config: &ScheduleConfig) -> Result<(Parameters, FixtureModel), ModelError> {
    let weeks = config.weeks_for(&input.roster);
    let attractiveness = attractiveness_scores(&input.roster, &input.ranks, weeks)?;
    let conflicts = conflict_pairs(&input.distances, config.conflict_threshold_km);
    let params = Parameters::new(&input.roster, weeks, &input.distances, &attractiveness, &conflicts)?;

    info!(
        "{} teams over {} weeks, {} conflict pairs ({})",
        params.teams(),
        weeks,
        conflicts.len(),
        if config.enforce_conflict_pairs { "enforced" } else { "not enforced" }
    );

    let model = FixtureModel::build(&params, config);
    Ok((params, model))
}

/// Run the full pipeline: parameters, model, solve, extraction.
///
/// Input problems are returned as `Err`; infeasibility, timeouts and solver
/// failures are part of the returned plan.
pub fn plan(input: &LeagueInput, config: &ScheduleConfig, solver: &Solver) -> Result<SeasonPlan, ModelError> {
    let (parameters, model) = prepare(input, config)?;
    let outcome = solver.solve(&model.to_problem());
    let schedule = outcome
        .assignment()
        .map(|assignment| Schedule::from_assignment(&model.variables, assignment));

    Ok(SeasonPlan {
        parameters,
        outcome,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use kickoff_solver::SolutionStatus;

    use super::*;
    use crate::constraints::ConstraintFamily;

    fn toy_league(distance: f64, rank: u32) -> LeagueInput {
        let roster = Roster::new(["A", "B", "C", "D"]).unwrap();
        let mut distances = DistanceMatrix::new();
        for i in roster.ids() {
            for j in roster.ids() {
                distances.insert((i, j), if i == j { 0.0 } else { distance });
            }
        }
        let ranks = roster.ids().map(|i| (i, rank)).collect();
        LeagueInput {
            roster,
            distances,
            ranks,
        }
    }

    #[test]
    fn test_toy_league_solves() {
        let input = toy_league(10.0, 1);
        let config = ScheduleConfig::default();
        let plan = plan(&input, &config, &Solver::new()).unwrap();

        assert_eq!(plan.outcome.status(), SolutionStatus::Optimal);
        let schedule = plan.schedule.expect("schedule");
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule.audit(&plan.parameters, &config), vec![]);

        // every team plays every week
        for team in 1..=4 {
            let weeks: Vec<usize> = schedule.team_fixtures(team).iter().map(|tf| tf.week).collect();
            assert_eq!(weeks, vec![1, 2, 3, 4, 5, 6]);
        }

        // 12 fixtures * 10² with zero attractiveness
        let recomputed = schedule.objective(&plan.parameters, &config.weights);
        assert!((recomputed - 1200.0).abs() < 1e-6);
        let reported = plan.outcome.assignment().unwrap().objective_value;
        assert!((recomputed - reported).abs() < 1e-6);
    }

    /// Solve the toy league and check the result against the same rules
    fn solve_clean(input: &LeagueInput, config: &ScheduleConfig) -> (SeasonPlan, Schedule) {
        let plan = plan(input, config, &Solver::new()).unwrap();
        assert_eq!(plan.outcome.status(), SolutionStatus::Optimal);
        let schedule = plan.schedule.clone().expect("schedule");
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule.audit(&plan.parameters, config), vec![]);
        (plan, schedule)
    }

    #[test]
    fn test_solves_with_home_away_balance() {
        let config = ScheduleConfig {
            enforce_home_away_balance: true,
            ..ScheduleConfig::default()
        };
        let (_, model) = prepare(&toy_league(10.0, 1), &config).unwrap();
        assert_eq!(model.family_counts()[&ConstraintFamily::HomeAwayBalance], 4);

        let (_, schedule) = solve_clean(&toy_league(10.0, 1), &config);
        for team in 1..=4 {
            let home = schedule.fixtures().iter().filter(|f| f.home == team).count();
            assert_eq!(home, 3);
        }
    }

    #[test]
    fn test_solves_without_window_limit() {
        let config = ScheduleConfig {
            enforce_consecutive_away_limit: false,
            ..ScheduleConfig::default()
        };
        let (plan, _) = solve_clean(&toy_league(10.0, 1), &config);
        assert!((plan.outcome.assignment().unwrap().objective_value - 1200.0).abs() < 1e-6);
    }

    #[test]
    fn test_solves_with_conflict_pairs() {
        let mut input = toy_league(100.0, 1);
        input.distances.insert((1, 2), 5.0);
        input.distances.insert((2, 1), 5.0);
        let config = ScheduleConfig {
            enforce_conflict_pairs: true,
            ..ScheduleConfig::default()
        };
        let (plan, schedule) = solve_clean(&input, &config);
        assert_eq!(plan.parameters.conflict_pairs(), &[(1, 2)]);

        for week in 1..=6 {
            let hosts: Vec<TeamId> = schedule
                .fixtures()
                .iter()
                .filter(|f| f.week == week)
                .map(|f| f.home)
                .collect();
            assert!(
                !(hosts.contains(&1) && hosts.contains(&2)),
                "week {} hosts {:?}",
                week,
                hosts
            );
        }
    }

    #[test]
    fn test_too_few_weeks_is_infeasible() {
        let input = toy_league(10.0, 1);
        let config = ScheduleConfig {
            weeks: Some(2),
            ..ScheduleConfig::default()
        };
        let plan = plan(&input, &config, &Solver::new()).unwrap();

        assert!(matches!(plan.outcome, SolveOutcome::Infeasible));
        assert!(plan.schedule.is_none());
    }

    #[test]
    fn test_ranked_league_matches_reported_objective() {
        let mut input = toy_league(0.0, 0);
        input.ranks = BTreeMap::from([(1, 60), (2, 50), (3, 10), (4, 0)]);
        let config = ScheduleConfig::default();
        let plan = plan(&input, &config, &Solver::new()).unwrap();

        let schedule = plan.schedule.expect("schedule");
        assert_eq!(schedule.audit(&plan.parameters, &config), vec![]);

        let recomputed = schedule.objective(&plan.parameters, &config.weights);
        let reported = plan.outcome.assignment().unwrap().objective_value;
        assert!((recomputed - reported).abs() < 1e-6);
        assert!(recomputed < 0.0);
    }

    #[test]
    fn test_prepare_reports_family_sizes() {
        let input = toy_league(10.0, 1);
        let config = ScheduleConfig {
            enforce_consecutive_away_limit: false,
            ..ScheduleConfig::default()
        };
        let (params, model) = prepare(&input, &config).unwrap();

        assert_eq!(params.weeks(), 6);
        assert_eq!(model.variables.len(), 96);
        let counts = model.family_counts();
        assert_eq!(counts[&ConstraintFamily::SingleFixture], 12);
        assert!(!counts.contains_key(&ConstraintFamily::ConsecutiveHome));
    }

    #[test]
    fn test_missing_input_fails_fast() {
        let mut input = toy_league(10.0, 1);
        input.ranks.remove(&3);
        assert_eq!(
            prepare(&input, &ScheduleConfig::default()).map(|_| ()),
            Err(ModelError::MissingRank(3))
        );

        let mut input = toy_league(10.0, 1);
        input.distances.remove(&(2, 4));
        assert_eq!(
            prepare(&input, &ScheduleConfig::default()).map(|_| ()),
            Err(ModelError::MissingDistance(2, 4))
        );
    }
}
