use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kickoff_model::{
    Coordinates, LeagueInput, MatchResult, ModelError, Roster, ScheduleConfig, Season, TeamId, distance_matrix,
    rank_scores,
};
use log::{debug, warn};
use serde::Deserialize;

/// A team and its stadium position
#[derive(Debug, Clone, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    #[serde(flatten)]
    pub venue: Coordinates,
}

/// On-disk scenario description
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub teams: Vec<TeamEntry>,
    /// Result CSVs, oldest season first, relative to the scenario file
    #[serde(default)]
    pub seasons: Vec<PathBuf>,
    /// Explicit rank scores by team name; replaces the computed ones
    #[serde(default)]
    pub ranks: Option<BTreeMap<String, u32>>,
    #[serde(default)]
    pub config: ScheduleConfig,
}

/// A scenario with every referenced file loaded
#[derive(Debug, Clone)]
pub struct Scenario {
    pub input: LeagueInput,
    pub seasons: Vec<Season>,
    pub config: ScheduleConfig,
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
    let file: ScenarioFile = serde_json::from_str(&source)
        .with_context(|| format!("Invalid scenario file: {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let roster = Roster::new(file.teams.iter().map(|t| t.name.clone()))?;
    let venues: HashMap<String, Coordinates> = file.teams.iter().map(|t| (t.name.clone(), t.venue)).collect();
    let distances = distance_matrix(&roster, &venues)?;

    let seasons = file
        .seasons
        .iter()
        .map(|p| load_season(&base.join(p)))
        .collect::<Result<Vec<_>>>()?;

    let ranks = match &file.ranks {
        Some(by_name) => ranks_by_id(&roster, by_name)?,
        None => rank_scores(&roster, &seasons),
    };

    Ok(Scenario {
        input: LeagueInput {
            roster,
            distances,
            ranks,
        },
        seasons,
        config: file.config,
    })
}

fn ranks_by_id(roster: &Roster, by_name: &BTreeMap<String, u32>) -> Result<BTreeMap<TeamId, u32>, ModelError> {
    by_name
        .iter()
        .map(|(name, &rank)| {
            roster
                .id(name)
                .map(|id| (id, rank))
                .ok_or_else(|| ModelError::UnknownTeam(name.clone()))
        })
        .collect()
}

/// Read one season of results in the football-data layout
/// (`HomeTeam`, `AwayTeam`, `FTR` columns; others are ignored).
///
/// Rows without a usable result, e.g. unplayed fixtures, are skipped.
pub fn load_season(path: &Path) -> Result<Season> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut results = Vec::new();
    let mut skipped = 0;
    for (row, record) in reader.deserialize::<MatchResult>().enumerate() {
        match record {
            Ok(result) => results.push(result),
            Err(e) => {
                skipped += 1;
                debug!("{}: row {} skipped: {}", path.display(), row + 2, e);
            }
        }
    }
    if skipped > 0 {
        warn!("{}: skipped {} unreadable rows", path.display(), skipped);
    }

    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Season::new(label, results))
}
