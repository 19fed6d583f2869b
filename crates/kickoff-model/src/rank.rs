//! Team strength from recent league tables.
//!
//! Each of the last three seasons is scored 3/1/0 for win/draw/loss, then the
//! season totals are blended 0.5 / 0.3 / 0.2 from most recent to oldest.

use std::collections::{BTreeMap, HashMap};

use crate::roster::{Roster, TeamId};

pub const POINTS_WIN: u32 = 3;
pub const POINTS_DRAW: u32 = 1;

/// Blend weights, most recent season first
pub const SEASON_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Full-time result, as in the `FTR` column of football-data files
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    #[cfg_attr(feature = "serde", serde(rename = "H"))]
    HomeWin,
    #[cfg_attr(feature = "serde", serde(rename = "D"))]
    Draw,
    #[cfg_attr(feature = "serde", serde(rename = "A"))]
    AwayWin,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    #[cfg_attr(feature = "serde", serde(rename = "HomeTeam"))]
    pub home: String,
    #[cfg_attr(feature = "serde", serde(rename = "AwayTeam"))]
    pub away: String,
    #[cfg_attr(feature = "serde", serde(rename = "FTR"))]
    pub outcome: MatchOutcome,
}

impl MatchResult {
    pub fn new(home: impl Into<String>, away: impl Into<String>, outcome: MatchOutcome) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
            outcome,
        }
    }

    /// Points earned by (home, away)
    pub fn points(&self) -> (u32, u32) {
        match self.outcome {
            MatchOutcome::HomeWin => (POINTS_WIN, 0),
            MatchOutcome::Draw => (POINTS_DRAW, POINTS_DRAW),
            MatchOutcome::AwayWin => (0, POINTS_WIN),
        }
    }
}

/// All results of one historical season
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Season {
    pub label: String,
    pub results: Vec<MatchResult>,
}

impl Season {
    pub fn new(label: impl Into<String>, results: Vec<MatchResult>) -> Self {
        Self {
            label: label.into(),
            results,
        }
    }
}

/// How a team's rank score was assembled
#[derive(Debug, Clone, PartialEq)]
pub struct RankBreakdown {
    pub team: TeamId,
    /// League points per season, most recent first; 0 where there is no data
    pub season_points: [u32; 3],
    pub score: u32,
}

/// League points per roster team for one season.
///
/// Matches against teams outside the roster are ignored.
pub fn season_points(roster: &Roster, season: &Season) -> HashMap<TeamId, u32> {
    let mut points = HashMap::new();
    for result in &season.results {
        let (Some(home), Some(away)) = (roster.id(&result.home), roster.id(&result.away)) else {
            continue;
        };
        let (home_pts, away_pts) = result.points();
        *points.entry(home).or_insert(0) += home_pts;
        *points.entry(away).or_insert(0) += away_pts;
    }
    points
}

/// Rank breakdown for every roster team. `seasons` is ordered oldest to newest.
pub fn rank_breakdown(roster: &Roster, seasons: &[Season]) -> Vec<RankBreakdown> {
    let recent: Vec<HashMap<TeamId, u32>> = seasons
        .iter()
        .rev()
        .take(SEASON_WEIGHTS.len())
        .map(|season| season_points(roster, season))
        .collect();

    roster
        .ids()
        .map(|team| {
            let mut season_points = [0; 3];
            for (slot, table) in season_points.iter_mut().zip(&recent) {
                *slot = table.get(&team).copied().unwrap_or(0);
            }
            let weighted: f64 = season_points
                .iter()
                .zip(SEASON_WEIGHTS)
                .map(|(&pts, w)| pts as f64 * w)
                .sum();
            RankBreakdown {
                team,
                season_points,
                score: weighted.round() as u32,
            }
        })
        .collect()
}

/// Rank score per team id
pub fn rank_scores(roster: &Roster, seasons: &[Season]) -> BTreeMap<TeamId, u32> {
    rank_breakdown(roster, seasons)
        .into_iter()
        .map(|b| (b.team, b.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use MatchOutcome::*;

    fn roster() -> Roster {
        Roster::new(["A", "B", "C"]).unwrap()
    }

    #[test]
    fn test_three_recent_wins() {
        let roster = roster();
        let recent = Season::new(
            "21-22",
            vec![
                MatchResult::new("A", "B", HomeWin),
                MatchResult::new("C", "A", AwayWin),
                MatchResult::new("A", "C", HomeWin),
            ],
        );
        let seasons = vec![Season::default(), Season::default(), recent];

        let ranks = rank_scores(&roster, &seasons);
        // round(0.5 * 9) = round(4.5) = 5
        assert_eq!(ranks[&1], 5);
        assert_eq!(ranks[&2], 0);
        assert_eq!(ranks[&3], 0);
    }

    #[test]
    fn test_weights_by_recency() {
        let roster = roster();
        let oldest = Season::new("19-20", vec![MatchResult::new("B", "C", HomeWin)]);
        let middle = Season::new("20-21", vec![MatchResult::new("B", "C", HomeWin)]);
        let newest = Season::new("21-22", vec![MatchResult::new("B", "C", Draw)]);
        // Older than the window, never counted
        let ancient = Season::new("18-19", vec![MatchResult::new("C", "B", HomeWin); 10]);

        let breakdown = rank_breakdown(&roster, &[ancient, oldest, middle, newest]);
        let b = &breakdown[1];
        assert_eq!(b.team, 2);
        assert_eq!(b.season_points, [1, 3, 3]);
        // 0.5 * 1 + 0.3 * 3 + 0.2 * 3 = 2.0
        assert_eq!(b.score, 2);

        let c = &breakdown[2];
        assert_eq!(c.season_points, [1, 0, 0]);
        // 0.5 rounds away from zero
        assert_eq!(c.score, 1);
    }

    #[test]
    fn test_foreign_teams_and_missing_seasons() {
        let roster = roster();
        let season = Season::new(
            "21-22",
            vec![
                MatchResult::new("A", "Relegated FC", HomeWin),
                MatchResult::new("Promoted FC", "B", AwayWin),
                MatchResult::new("C", "B", Draw),
            ],
        );

        // Only one season of data: the two older slots contribute nothing
        let breakdown = rank_breakdown(&roster, &[season]);
        assert_eq!(breakdown[0].season_points, [0, 0, 0]);
        assert_eq!(breakdown[1].season_points, [1, 0, 0]);
        assert_eq!(breakdown[2].season_points, [1, 0, 0]);
        assert!(rank_scores(&roster, &[]).values().all(|&r| r == 0));
    }
}
