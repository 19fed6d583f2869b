use std::collections::BTreeMap;

use crate::error::ModelError;
use crate::roster::{Roster, TeamId, Week};

/// Desirability per (home, away, week), total over the cross product
pub type AttractivenessMap = BTreeMap<(TeamId, TeamId, Week), f64>;

/// Fixture desirability: grows with combined rank and with the week index,
/// shrinks towards zero as the two ranks converge.
pub fn attractiveness(rank_home: u32, rank_away: u32, week: Week) -> f64 {
    let combined = rank_home as f64 + rank_away as f64;
    let gap = rank_home.abs_diff(rank_away) as f64;
    combined * (1.0 + week as f64 / 10.0) * (1.0 - 1.0 / (1.0 + gap))
}

/// Score every (i, j, k) including `i == j`
pub fn attractiveness_scores(
    roster: &Roster,
    ranks: &BTreeMap<TeamId, u32>,
    weeks: usize,
) -> Result<AttractivenessMap, ModelError> {
    let rank = |team: TeamId| ranks.get(&team).copied().ok_or(ModelError::MissingRank(team));

    let mut scores = AttractivenessMap::new();
    for i in roster.ids() {
        let r_i = rank(i)?;
        for j in roster.ids() {
            let r_j = rank(j)?;
            for k in 1..=weeks {
                scores.insert((i, j, k), attractiveness(r_i, r_j, k));
            }
        }
    }
    Ok(scores)
}
