use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::error::ModelError;

/// 1-based team identifier, stable for the season
pub type TeamId = usize;
/// 1-based week index
pub type Week = usize;

/// Ordered team list with a stable name → id mapping.
///
/// The team at position `p` gets id `p + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    names: Vec<String>,
    ids: HashMap<String, TeamId>,
}

impl Roster {
    pub fn new<I, S>(names: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() < 2 {
            return Err(ModelError::TooFewTeams(names.len()));
        }

        let mut ids = HashMap::with_capacity(names.len());
        for (pos, name) in names.iter().enumerate() {
            if ids.insert(name.clone(), pos + 1).is_some() {
                return Err(ModelError::DuplicateTeam(name.clone()));
            }
        }
        Ok(Self { names, ids })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> RangeInclusive<TeamId> {
        1..=self.names.len()
    }

    pub fn id(&self, name: &str) -> Option<TeamId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: TeamId) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|pos| self.names.get(pos))
            .map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// Weeks in a double round-robin: 2(N-1)
    pub fn double_round_robin_weeks(&self) -> usize {
        2 * (self.names.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_order() {
        let roster = Roster::new(["Bayern", "Dortmund", "Leipzig"]).unwrap();
        assert_eq!(roster.id("Bayern"), Some(1));
        assert_eq!(roster.id("Leipzig"), Some(3));
        assert_eq!(roster.name(2), Some("Dortmund"));
        assert_eq!(roster.name(0), None);
        assert_eq!(roster.name(4), None);
        assert_eq!(roster.ids(), 1..=3);
        assert_eq!(roster.double_round_robin_weeks(), 4);
    }

    #[test]
    fn test_bundesliga_has_34_weeks() {
        let roster = Roster::new((1..=18).map(|i| format!("team{}", i))).unwrap();
        assert_eq!(roster.double_round_robin_weeks(), 34);
    }

    #[test]
    fn test_rejects_duplicates_and_tiny_leagues() {
        assert_eq!(
            Roster::new(["A", "B", "A"]),
            Err(ModelError::DuplicateTeam("A".to_string()))
        );
        assert_eq!(Roster::new(["A"]), Err(ModelError::TooFewTeams(1)));
        assert_eq!(Roster::new(Vec::<String>::new()), Err(ModelError::TooFewTeams(0)));
    }
}
