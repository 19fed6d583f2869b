mod backend;
mod problem;
mod solution;
mod solver;

pub use backend::{BackendKind, GoodLpBackend, MipBackend};
pub use problem::{Constraint, ConstraintOp, MipProblem, Objective};
pub use solution::{Assignment, SolutionStatus, SolveOutcome, SolverError};
pub use solver::Solver;
