use std::time::Duration;

use kickoff_solver::{BackendKind, GoodLpBackend, Solver};

use crate::distance::CONFLICT_THRESHOLD_KM;
use crate::roster::Roster;

/// Relative weight of the two objective terms
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveWeights {
    /// Multiplier on the squared travel distance
    pub distance: f64,
    /// Multiplier on the attractiveness reward
    pub attractiveness: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            distance: 1.0,
            attractiveness: 1.0,
        }
    }
}

/// Knobs for one optimization run
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    /// Season length; `None` means a double round-robin, 2(N-1)
    pub weeks: Option<usize>,
    pub weights: ObjectiveWeights,
    /// Require home count == away count for every team
    pub enforce_home_away_balance: bool,
    /// At most two home and two away fixtures in any three consecutive weeks
    pub enforce_consecutive_away_limit: bool,
    /// Close neighbours never both host in the same week
    pub enforce_conflict_pairs: bool,
    /// Venues closer than this (km) form a conflict pair
    pub conflict_threshold_km: f64,
    /// Wall-clock budget for the solve call, in seconds
    pub time_limit_secs: Option<f64>,
    pub backend: BackendKind,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            weeks: None,
            weights: ObjectiveWeights::default(),
            enforce_home_away_balance: false,
            enforce_consecutive_away_limit: true,
            enforce_conflict_pairs: false,
            conflict_threshold_km: CONFLICT_THRESHOLD_KM,
            time_limit_secs: None,
            backend: BackendKind::default(),
        }
    }
}

impl ScheduleConfig {
    pub fn weeks_for(&self, roster: &Roster) -> usize {
        self.weeks.unwrap_or_else(|| roster.double_round_robin_weeks())
    }

    /// Budget as a `Duration`; non-positive or non-finite values mean no budget
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
    }

    pub fn solver(&self) -> Solver {
        let solver = Solver::new().with_backend(GoodLpBackend::new(self.backend));
        match self.time_limit() {
            Some(limit) => solver.with_time_limit(limit),
            None => solver,
        }
    }
}
