//! Reading a solved assignment back into fixtures, and checking the result.

use std::collections::{BTreeMap, HashMap};

use kickoff_solver::Assignment;

use crate::config::{ObjectiveWeights, ScheduleConfig};
use crate::constraints::ConstraintFamily;
use crate::objective::fixture_cost;
use crate::params::Parameters;
use crate::roster::{Roster, TeamId, Week};
use crate::variables::VariableSet;

/// `home` hosts `away` in `week`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixture {
    pub week: Week,
    pub home: TeamId,
    pub away: TeamId,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
}

/// One entry of a team's own calendar
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamFixture {
    pub week: Week,
    pub opponent: TeamId,
    pub venue: Venue,
}

/// A rule the schedule breaks
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub family: ConstraintFamily,
    pub message: String,
}

impl Violation {
    fn new(family: ConstraintFamily, message: impl Into<String>) -> Self {
        Self {
            family,
            message: message.into(),
        }
    }
}

/// The chosen fixtures of a season, sorted by week then home team
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    teams: usize,
    weeks: usize,
    fixtures: Vec<Fixture>,
}

impl Schedule {
    pub fn from_fixtures(teams: usize, weeks: usize, mut fixtures: Vec<Fixture>) -> Self {
        fixtures.sort();
        Self { teams, weeks, fixtures }
    }

    /// Every variable with a non-zero value becomes a fixture
    pub fn from_assignment(vars: &VariableSet, assignment: &Assignment) -> Self {
        let fixtures = assignment
            .values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(index, _)| {
                let (home, away, week) = vars.triple(index);
                Fixture { week, home, away }
            })
            .collect();
        Self::from_fixtures(vars.teams(), vars.weeks(), fixtures)
    }

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn weeks(&self) -> usize {
        self.weeks
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// `matrix[home - 1][away - 1]` is the week `home` hosts `away`
    pub fn matrix(&self) -> Vec<Vec<Option<Week>>> {
        let mut matrix = vec![vec![None; self.teams]; self.teams];
        for f in &self.fixtures {
            matrix[f.home - 1][f.away - 1] = Some(f.week);
        }
        matrix
    }

    /// A team's fixtures in week order, home and away
    pub fn team_fixtures(&self, team: TeamId) -> Vec<TeamFixture> {
        self.fixtures
            .iter()
            .filter_map(|f| {
                if f.home == team {
                    Some(TeamFixture {
                        week: f.week,
                        opponent: f.away,
                        venue: Venue::Home,
                    })
                } else if f.away == team {
                    Some(TeamFixture {
                        week: f.week,
                        opponent: f.home,
                        venue: Venue::Away,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn by_team(&self) -> BTreeMap<TeamId, Vec<TeamFixture>> {
        (1..=self.teams).map(|t| (t, self.team_fixtures(t))).collect()
    }

    /// Fixtures as `(home name, away name, week)`
    pub fn named<'a>(&self, roster: &'a Roster) -> Vec<(&'a str, &'a str, Week)> {
        self.fixtures
            .iter()
            .filter_map(|f| Some((roster.name(f.home)?, roster.name(f.away)?, f.week)))
            .collect()
    }

    /// Objective recomputed from the fixtures alone
    pub fn objective(&self, params: &Parameters, weights: &ObjectiveWeights) -> f64 {
        self.fixtures
            .iter()
            .map(|f| fixture_cost(params, weights, f.home, f.away, f.week))
            .sum()
    }

    /// Check every enabled league rule against the fixtures
    pub fn audit(&self, params: &Parameters, config: &ScheduleConfig) -> Vec<Violation> {
        let mut violations = Vec::new();
        let week_of: HashMap<(TeamId, TeamId), Vec<Week>> =
            self.fixtures.iter().fold(HashMap::new(), |mut acc, f| {
                acc.entry((f.home, f.away)).or_default().push(f.week);
                acc
            });

        for f in self.fixtures.iter().filter(|f| f.home == f.away) {
            violations.push(Violation::new(
                ConstraintFamily::NoSelfFixture,
                format!("team {} hosts itself in week {}", f.home, f.week),
            ));
        }

        for i in 1..=self.teams {
            for j in (1..=self.teams).filter(|&j| j != i) {
                let legs = week_of.get(&(i, j)).map_or(0, Vec::len);
                if legs != 1 {
                    violations.push(Violation::new(
                        ConstraintFamily::SingleFixture,
                        format!("team {} hosts team {} {} times", i, j, legs),
                    ));
                }
            }
        }

        let mut played: HashMap<(TeamId, Week), usize> = HashMap::new();
        for f in &self.fixtures {
            *played.entry((f.home, f.week)).or_insert(0) += 1;
            *played.entry((f.away, f.week)).or_insert(0) += 1;
        }
        let mut busy: Vec<_> = played.into_iter().filter(|&(_, n)| n > 1).collect();
        busy.sort();
        for ((team, week), n) in busy {
            violations.push(Violation::new(
                ConstraintFamily::OneFixturePerWeek,
                format!("team {} plays {} times in week {}", team, n, week),
            ));
        }

        for i in 1..=self.teams {
            for j in (i + 1)..=self.teams {
                let legs: Vec<Week> = [(i, j), (j, i)]
                    .iter()
                    .filter_map(|pair| week_of.get(pair))
                    .flatten()
                    .copied()
                    .collect();
                for (family, half) in [
                    (ConstraintFamily::FirstHalfSplit, params.first_half()),
                    (ConstraintFamily::SecondHalfSplit, params.second_half()),
                ] {
                    let in_half = legs.iter().filter(|&&w| half.contains(&w)).count();
                    if in_half > 1 {
                        violations.push(Violation::new(
                            family,
                            format!("teams {} and {} meet {} times in one half", i, j, in_half),
                        ));
                    }
                }
            }
        }

        if config.enforce_home_away_balance {
            for t in 1..=self.teams {
                let home = self.fixtures.iter().filter(|f| f.home == t).count();
                let away = self.fixtures.iter().filter(|f| f.away == t).count();
                if home != away {
                    violations.push(Violation::new(
                        ConstraintFamily::HomeAwayBalance,
                        format!("team {} has {} home and {} away fixtures", t, home, away),
                    ));
                }
            }
        }

        if config.enforce_consecutive_away_limit {
            for t in 1..=self.teams {
                let calendar = self.team_fixtures(t);
                for start in (1..=self.weeks).filter(|k| k + 2 <= self.weeks) {
                    let window = start..=start + 2;
                    for (family, venue) in [
                        (ConstraintFamily::ConsecutiveHome, Venue::Home),
                        (ConstraintFamily::ConsecutiveAway, Venue::Away),
                    ] {
                        let n = calendar
                            .iter()
                            .filter(|tf| tf.venue == venue && window.contains(&tf.week))
                            .count();
                        if n > 2 {
                            violations.push(Violation::new(
                                family,
                                format!("team {} has {} {:?} fixtures in weeks {}-{}", t, n, venue, start, start + 2),
                            ));
                        }
                    }
                }
            }
        }

        if config.enforce_conflict_pairs {
            for &(a, b) in params.conflict_pairs() {
                for week in 1..=self.weeks {
                    let hosts = self
                        .fixtures
                        .iter()
                        .filter(|f| f.week == week && (f.home == a || f.home == b))
                        .count();
                    if hosts > 1 {
                        violations.push(Violation::new(
                            ConstraintFamily::ConflictPair,
                            format!("neighbours {} and {} both host in week {}", a, b, week),
                        ));
                    }
                }
            }
        }

        violations
    }
}
