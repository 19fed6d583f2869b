use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::attractiveness::AttractivenessMap;
use crate::distance::DistanceMatrix;
use crate::error::ModelError;
use crate::roster::{Roster, TeamId, Week};

/// Validated, dense model parameters.
///
/// Construction checks that every (team, team) distance and every
/// (team, team, week) attractiveness is present and finite, so lookups
/// afterwards cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    teams: usize,
    weeks: usize,
    distance: Vec<f64>,
    attractiveness: Vec<f64>,
    conflict_pairs: Vec<(TeamId, TeamId)>,
}

impl Parameters {
    pub fn new(
        roster: &Roster,
        weeks: usize,
        distances: &DistanceMatrix,
        attractiveness: &AttractivenessMap,
        conflict_pairs: &BTreeSet<(TeamId, TeamId)>,
    ) -> Result<Self, ModelError> {
        if weeks == 0 {
            return Err(ModelError::NoWeeks);
        }
        let teams = roster.len();

        let mut distance = Vec::with_capacity(teams * teams);
        for i in roster.ids() {
            for j in roster.ids() {
                let d = *distances.get(&(i, j)).ok_or(ModelError::MissingDistance(i, j))?;
                if !d.is_finite() || d < 0.0 {
                    return Err(ModelError::InvalidDistance { home: i, away: j, value: d });
                }
                distance.push(d);
            }
        }

        let mut scores = Vec::with_capacity(teams * teams * weeks);
        for i in roster.ids() {
            for j in roster.ids() {
                for k in 1..=weeks {
                    let a = *attractiveness
                        .get(&(i, j, k))
                        .ok_or(ModelError::MissingAttractiveness(i, j, k))?;
                    if !a.is_finite() {
                        return Err(ModelError::InvalidAttractiveness {
                            home: i,
                            away: j,
                            week: k,
                            value: a,
                        });
                    }
                    scores.push(a);
                }
            }
        }

        for &(i, j) in conflict_pairs {
            for team in [i, j] {
                if !roster.ids().contains(&team) {
                    return Err(ModelError::UnknownTeamId(team));
                }
            }
        }

        Ok(Self {
            teams,
            weeks,
            distance,
            attractiveness: scores,
            conflict_pairs: conflict_pairs.iter().copied().collect(),
        })
    }

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn weeks(&self) -> usize {
        self.weeks
    }

    pub fn team_ids(&self) -> RangeInclusive<TeamId> {
        1..=self.teams
    }

    pub fn week_ids(&self) -> RangeInclusive<Week> {
        1..=self.weeks
    }

    /// Weeks 1..=W/2
    pub fn first_half(&self) -> RangeInclusive<Week> {
        1..=self.weeks / 2
    }

    /// Weeks W/2+1..=W
    pub fn second_half(&self) -> RangeInclusive<Week> {
        self.weeks / 2 + 1..=self.weeks
    }

    pub fn distance(&self, home: TeamId, away: TeamId) -> f64 {
        self.distance[(home - 1) * self.teams + (away - 1)]
    }

    pub fn attractiveness(&self, home: TeamId, away: TeamId, week: Week) -> f64 {
        self.attractiveness[((home - 1) * self.teams + (away - 1)) * self.weeks + (week - 1)]
    }

    pub fn conflict_pairs(&self) -> &[(TeamId, TeamId)] {
        &self.conflict_pairs
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::attractiveness::attractiveness_scores;

    fn inputs() -> (Roster, DistanceMatrix, AttractivenessMap) {
        let roster = Roster::new(["A", "B", "C"]).unwrap();
        let mut distances = DistanceMatrix::new();
        for i in roster.ids() {
            for j in roster.ids() {
                distances.insert((i, j), if i == j { 0.0 } else { (i + j) as f64 });
            }
        }
        let ranks = BTreeMap::from([(1, 30), (2, 20), (3, 10)]);
        let scores = attractiveness_scores(&roster, &ranks, 4).unwrap();
        (roster, distances, scores)
    }

    #[test]
    fn test_lookups_match_maps() {
        let (roster, distances, scores) = inputs();
        let params = Parameters::new(&roster, 4, &distances, &scores, &BTreeSet::from([(1, 3)])).unwrap();

        assert_eq!(params.distance(2, 3), 5.0);
        assert_eq!(params.distance(3, 3), 0.0);
        assert_eq!(params.attractiveness(1, 3, 4), scores[&(1, 3, 4)]);
        assert_eq!(params.attractiveness(3, 2, 1), scores[&(3, 2, 1)]);
        assert_eq!(params.first_half(), 1..=2);
        assert_eq!(params.second_half(), 3..=4);
        assert_eq!(params.conflict_pairs(), &[(1, 3)]);
    }

    #[test]
    fn test_rejects_incomplete_inputs() {
        let (roster, mut distances, mut scores) = inputs();
        let none = BTreeSet::new();

        assert_eq!(
            Parameters::new(&roster, 0, &distances, &scores, &none),
            Err(ModelError::NoWeeks)
        );
        assert_eq!(
            Parameters::new(&roster, 5, &distances, &scores, &none),
            Err(ModelError::MissingAttractiveness(1, 1, 5))
        );
        assert_eq!(
            Parameters::new(&roster, 4, &distances, &scores, &BTreeSet::from([(2, 9)])),
            Err(ModelError::UnknownTeamId(9))
        );

        scores.insert((2, 1, 3), f64::NAN);
        assert!(matches!(
            Parameters::new(&roster, 4, &distances, &scores, &none),
            Err(ModelError::InvalidAttractiveness { home: 2, away: 1, week: 3, .. })
        ));

        distances.insert((1, 2), -4.0);
        assert_eq!(
            Parameters::new(&roster, 4, &distances, &scores, &none),
            Err(ModelError::InvalidDistance { home: 1, away: 2, value: -4.0 })
        );

        distances.remove(&(3, 1));
        distances.insert((1, 2), 3.0);
        assert_eq!(
            Parameters::new(&roster, 4, &distances, &scores, &none),
            Err(ModelError::MissingDistance(3, 1))
        );
    }
}
