use thiserror::Error;

use crate::roster::{TeamId, Week};

/// Input problems detected before a model is handed to a solver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("A league needs at least 2 teams, got {0}")]
    TooFewTeams(usize),
    #[error("Duplicate team: {0}")]
    DuplicateTeam(String),
    #[error("Unknown team: {0}")]
    UnknownTeam(String),
    #[error("Unknown team id: {0}")]
    UnknownTeamId(TeamId),
    #[error("Season needs at least one week")]
    NoWeeks,
    #[error("Missing coordinates for team {0}")]
    MissingCoordinates(String),
    #[error("Missing distance for ({0}, {1})")]
    MissingDistance(TeamId, TeamId),
    #[error("Invalid distance {value} for ({home}, {away})")]
    InvalidDistance { home: TeamId, away: TeamId, value: f64 },
    #[error("Missing rank for team {0}")]
    MissingRank(TeamId),
    #[error("Missing attractiveness for ({0}, {1}) in week {2}")]
    MissingAttractiveness(TeamId, TeamId, Week),
    #[error("Invalid attractiveness {value} for ({home}, {away}) in week {week}")]
    InvalidAttractiveness {
        home: TeamId,
        away: TeamId,
        week: Week,
        value: f64,
    },
}
