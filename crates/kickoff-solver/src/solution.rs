use thiserror::Error;

/// Variable values produced by a backend
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Value for each variable, in problem order
    pub values: Vec<f64>,
    /// Objective value of `values`
    pub objective_value: f64,
    /// Whether the backend proved optimality
    pub optimal: bool,
}

/// Terminal result of a solve call
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    /// Every variable resolved
    Solved(Assignment),
    /// No assignment satisfies all constraints
    Infeasible,
    /// The wall-clock budget ran out. `incumbent` is the best assignment the
    /// backend reported before stopping, if it offers one.
    Timeout { incumbent: Option<Assignment> },
    /// The backend itself failed
    Failed(SolverError),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The time budget expired
    TimedOut,
    /// Solver encountered an error
    Error,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem is unbounded")]
    Unbounded,
    #[error("Objective has {found} coefficients for {expected} variables")]
    ObjectiveMismatch { expected: usize, found: usize },
    #[error("Constraint {constraint} references unknown variable {index}")]
    UnknownVariable { constraint: String, index: usize },
    #[error("Backend {backend} failed: {message}")]
    Backend { backend: String, message: String },
    #[error("Solver worker stopped without a result")]
    WorkerLost,
}

impl SolveOutcome {
    pub fn status(&self) -> SolutionStatus {
        match self {
            SolveOutcome::Solved(_) => SolutionStatus::Optimal,
            SolveOutcome::Infeasible => SolutionStatus::Infeasible,
            SolveOutcome::Timeout { .. } => SolutionStatus::TimedOut,
            SolveOutcome::Failed(_) => SolutionStatus::Error,
        }
    }

    /// The assignment to use downstream, if any. Timeout incumbents count,
    /// check `Assignment::optimal` to tell them apart.
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolveOutcome::Solved(a) => Some(a),
            SolveOutcome::Timeout { incumbent } => incumbent.as_ref(),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let assignment = Assignment {
            values: vec![1.0],
            objective_value: 3.0,
            optimal: false,
        };
        assert_eq!(SolveOutcome::Infeasible.status(), SolutionStatus::Infeasible);
        assert_eq!(
            SolveOutcome::Failed(SolverError::WorkerLost).status(),
            SolutionStatus::Error
        );

        let timeout = SolveOutcome::Timeout {
            incumbent: Some(assignment),
        };
        assert_eq!(timeout.status(), SolutionStatus::TimedOut);
        assert!(!timeout.is_solved());
        assert_eq!(timeout.assignment().map(|a| a.objective_value), Some(3.0));
        assert!(SolveOutcome::Timeout { incumbent: None }.assignment().is_none());
    }
}
