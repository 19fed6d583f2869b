pub mod attractiveness;
pub mod builder;
pub mod config;
pub mod constraints;
pub mod distance;
pub mod error;
pub mod objective;
pub mod params;
pub mod pipeline;
pub mod rank;
pub mod roster;
pub mod schedule;
pub mod variables;

pub use attractiveness::{AttractivenessMap, attractiveness, attractiveness_scores};
pub use builder::FixtureModel;
pub use config::{ObjectiveWeights, ScheduleConfig};
pub use constraints::{ConstraintFamily, FixtureConstraint, build_constraints};
pub use distance::{Coordinates, DistanceMatrix, conflict_pairs, distance_matrix};
pub use error::ModelError;
pub use params::Parameters;
pub use pipeline::{LeagueInput, SeasonPlan, plan, prepare};
pub use rank::{MatchOutcome, MatchResult, RankBreakdown, Season, rank_breakdown, rank_scores};
pub use roster::{Roster, TeamId, Week};
pub use schedule::{Fixture, Schedule, TeamFixture, Venue, Violation};
pub use variables::VariableSet;
