//! League rules as constraint families over `x[i, j, k]`.
//!
//! Every family is generated by a pure function of the variable space and the
//! parameters. The result is plain data that the builder lowers into a
//! [`MipProblem`](kickoff_solver::MipProblem).

use std::collections::BTreeMap;
use std::fmt;

use kickoff_solver::ConstraintOp;

use crate::config::ScheduleConfig;
use crate::params::Parameters;
use crate::roster::{TeamId, Week};
use crate::variables::VariableSet;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintFamily {
    /// Σ_k x[i,j,k] = 1 for i ≠ j
    SingleFixture,
    /// Σ_j x[i,j,k] + Σ_j x[j,i,k] ≤ 1
    OneFixturePerWeek,
    /// x[i,i,k] = 0
    NoSelfFixture,
    /// Σ_{k ≤ W/2} x[i,j,k] + x[j,i,k] ≤ 1
    FirstHalfSplit,
    /// Σ_{k > W/2} x[i,j,k] + x[j,i,k] ≤ 1
    SecondHalfSplit,
    /// Σ_{j,k} x[i,j,k] = Σ_{j,k} x[j,i,k]
    HomeAwayBalance,
    /// Σ_{j, t in k..k+2} x[i,j,t] ≤ 2
    ConsecutiveHome,
    /// Σ_{j, t in k..k+2} x[j,i,t] ≤ 2
    ConsecutiveAway,
    /// Σ_l x[i,l,k] + x[j,l,k] ≤ 1 for close neighbours i, j
    ConflictPair,
}

impl ConstraintFamily {
    pub const ALL: [ConstraintFamily; 9] = [
        ConstraintFamily::SingleFixture,
        ConstraintFamily::OneFixturePerWeek,
        ConstraintFamily::NoSelfFixture,
        ConstraintFamily::FirstHalfSplit,
        ConstraintFamily::SecondHalfSplit,
        ConstraintFamily::HomeAwayBalance,
        ConstraintFamily::ConsecutiveHome,
        ConstraintFamily::ConsecutiveAway,
        ConstraintFamily::ConflictPair,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConstraintFamily::SingleFixture => "single_fixture",
            ConstraintFamily::OneFixturePerWeek => "one_fixture_per_week",
            ConstraintFamily::NoSelfFixture => "no_self_fixture",
            ConstraintFamily::FirstHalfSplit => "first_half_split",
            ConstraintFamily::SecondHalfSplit => "second_half_split",
            ConstraintFamily::HomeAwayBalance => "home_away_balance",
            ConstraintFamily::ConsecutiveHome => "consecutive_home",
            ConstraintFamily::ConsecutiveAway => "consecutive_away",
            ConstraintFamily::ConflictPair => "conflict_pair",
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One generated constraint: family, index tuple, linear terms, relation, bound
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureConstraint {
    pub family: ConstraintFamily,
    pub index: Vec<usize>,
    pub terms: Vec<(usize, f64)>,
    pub relation: ConstraintOp,
    pub bound: f64,
}

impl FixtureConstraint {
    fn new(
        family: ConstraintFamily,
        index: Vec<usize>,
        terms: Vec<(usize, f64)>,
        relation: ConstraintOp,
        bound: f64,
    ) -> Self {
        Self {
            family,
            index,
            terms,
            relation,
            bound,
        }
    }

    /// e.g. `single_fixture[3,7]`
    pub fn name(&self) -> String {
        let index: Vec<String> = self.index.iter().map(ToString::to_string).collect();
        format!("{}[{}]", self.family, index.join(","))
    }
}

/// Every enabled constraint family, in a stable order
pub fn build_constraints(
    vars: &VariableSet,
    params: &Parameters,
    config: &ScheduleConfig,
) -> Vec<FixtureConstraint> {
    let mut constraints = single_fixture(vars);
    constraints.extend(one_fixture_per_week(vars));
    constraints.extend(no_self_fixture(vars));
    constraints.extend(half_season_split(vars, params));
    if config.enforce_home_away_balance {
        constraints.extend(home_away_balance(vars));
    }
    if config.enforce_consecutive_away_limit {
        constraints.extend(consecutive_limit(vars));
    }
    if config.enforce_conflict_pairs {
        constraints.extend(conflict_pairs(vars, params));
    }
    constraints
}

/// Count constraints per family
pub fn family_counts(constraints: &[FixtureConstraint]) -> BTreeMap<ConstraintFamily, usize> {
    let mut counts = BTreeMap::new();
    for c in constraints {
        *counts.entry(c.family).or_insert(0) += 1;
    }
    counts
}

fn teams(vars: &VariableSet) -> std::ops::RangeInclusive<TeamId> {
    1..=vars.teams()
}

fn weeks(vars: &VariableSet) -> std::ops::RangeInclusive<Week> {
    1..=vars.weeks()
}

pub fn single_fixture(vars: &VariableSet) -> Vec<FixtureConstraint> {
    let mut out = Vec::new();
    for i in teams(vars) {
        for j in teams(vars).filter(|&j| j != i) {
            let terms = weeks(vars).map(|k| (vars.index(i, j, k), 1.0)).collect();
            out.push(FixtureConstraint::new(
                ConstraintFamily::SingleFixture,
                vec![i, j],
                terms,
                ConstraintOp::Eq,
                1.0,
            ));
        }
    }
    out
}

pub fn one_fixture_per_week(vars: &VariableSet) -> Vec<FixtureConstraint> {
    let mut out = Vec::new();
    for i in teams(vars) {
        for k in weeks(vars) {
            let mut terms = Vec::with_capacity(2 * vars.teams());
            for j in teams(vars) {
                terms.push((vars.index(i, j, k), 1.0));
                terms.push((vars.index(j, i, k), 1.0));
            }
            out.push(FixtureConstraint::new(
                ConstraintFamily::OneFixturePerWeek,
                vec![i, k],
                terms,
                ConstraintOp::Le,
                1.0,
            ));
        }
    }
    out
}

pub fn no_self_fixture(vars: &VariableSet) -> Vec<FixtureConstraint> {
    let mut out = Vec::new();
    for i in teams(vars) {
        for k in weeks(vars) {
            out.push(FixtureConstraint::new(
                ConstraintFamily::NoSelfFixture,
                vec![i, k],
                vec![(vars.index(i, i, k), 1.0)],
                ConstraintOp::Eq,
                0.0,
            ));
        }
    }
    out
}

/// The two legs of a pairing never share a half. Generated for both
/// orientations of every pair.
pub fn half_season_split(vars: &VariableSet, params: &Parameters) -> Vec<FixtureConstraint> {
    let halves = [
        (ConstraintFamily::FirstHalfSplit, params.first_half()),
        (ConstraintFamily::SecondHalfSplit, params.second_half()),
    ];

    let mut out = Vec::new();
    for (family, half) in halves {
        for i in teams(vars) {
            for j in teams(vars).filter(|&j| j != i) {
                let mut terms = Vec::new();
                for k in half.clone() {
                    terms.push((vars.index(i, j, k), 1.0));
                    terms.push((vars.index(j, i, k), 1.0));
                }
                out.push(FixtureConstraint::new(family, vec![i, j], terms, ConstraintOp::Le, 1.0));
            }
        }
    }
    out
}

pub fn home_away_balance(vars: &VariableSet) -> Vec<FixtureConstraint> {
    let mut out = Vec::new();
    for i in teams(vars) {
        let mut terms = Vec::new();
        for j in teams(vars).filter(|&j| j != i) {
            for k in weeks(vars) {
                terms.push((vars.index(i, j, k), 1.0));
                terms.push((vars.index(j, i, k), -1.0));
            }
        }
        out.push(FixtureConstraint::new(
            ConstraintFamily::HomeAwayBalance,
            vec![i],
            terms,
            ConstraintOp::Eq,
            0.0,
        ));
    }
    out
}

/// At most two hosting and two visiting fixtures in every window of three
/// consecutive weeks. Windows that run past the last week are skipped.
pub fn consecutive_limit(vars: &VariableSet) -> Vec<FixtureConstraint> {
    let mut out = Vec::new();
    for i in teams(vars) {
        for start in (1..=vars.weeks()).filter(|k| k + 2 <= vars.weeks()) {
            let mut home = Vec::new();
            let mut away = Vec::new();
            for t in start..=start + 2 {
                for j in teams(vars) {
                    home.push((vars.index(i, j, t), 1.0));
                    away.push((vars.index(j, i, t), 1.0));
                }
            }
            out.push(FixtureConstraint::new(
                ConstraintFamily::ConsecutiveHome,
                vec![i, start],
                home,
                ConstraintOp::Le,
                2.0,
            ));
            out.push(FixtureConstraint::new(
                ConstraintFamily::ConsecutiveAway,
                vec![i, start],
                away,
                ConstraintOp::Le,
                2.0,
            ));
        }
    }
    out
}

pub fn conflict_pairs(vars: &VariableSet, params: &Parameters) -> Vec<FixtureConstraint> {
    let mut out = Vec::new();
    for &(a, b) in params.conflict_pairs() {
        for k in weeks(vars) {
            let mut terms = Vec::with_capacity(2 * vars.teams());
            for l in teams(vars) {
                terms.push((vars.index(a, l, k), 1.0));
                terms.push((vars.index(b, l, k), 1.0));
            }
            out.push(FixtureConstraint::new(
                ConstraintFamily::ConflictPair,
                vec![a, b, k],
                terms,
                ConstraintOp::Le,
                1.0,
            ));
        }
    }
    out
}
