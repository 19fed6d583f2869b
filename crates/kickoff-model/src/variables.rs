use crate::roster::{TeamId, Week};

/// Index space of the decision variables `x[i, j, k]` ("i hosts j in week k").
///
/// Variables are laid out home-major, then away, then week, so all weeks of
/// one pairing are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSet {
    teams: usize,
    weeks: usize,
}

impl VariableSet {
    pub fn new(teams: usize, weeks: usize) -> Self {
        Self { teams, weeks }
    }

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn weeks(&self) -> usize {
        self.weeks
    }

    pub fn len(&self) -> usize {
        self.teams * self.teams * self.weeks
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, home: TeamId, away: TeamId, week: Week) -> usize {
        debug_assert!((1..=self.teams).contains(&home) && (1..=self.teams).contains(&away));
        debug_assert!((1..=self.weeks).contains(&week));
        ((home - 1) * self.teams + (away - 1)) * self.weeks + (week - 1)
    }

    /// Inverse of [`VariableSet::index`]
    pub fn triple(&self, index: usize) -> (TeamId, TeamId, Week) {
        let week = index % self.weeks + 1;
        let pair = index / self.weeks;
        (pair / self.teams + 1, pair % self.teams + 1, week)
    }

    pub fn name(&self, home: TeamId, away: TeamId, week: Week) -> String {
        format!("x_{}_{}_{}", home, away, week)
    }

    pub fn names(&self) -> Vec<String> {
        (0..self.len())
            .map(|index| {
                let (i, j, k) = self.triple(index);
                self.name(i, j, k)
            })
            .collect()
    }
}
