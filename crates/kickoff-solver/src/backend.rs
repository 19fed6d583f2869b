use std::time::Duration;

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus as LpStatus, SolverModel, Variable,
    WithTimeLimit, variable,
};
use log::debug;

use crate::problem::{ConstraintOp, MipProblem};
use crate::solution::{Assignment, SolveOutcome, SolverError};

const FEASIBILITY_TOL: f64 = 1e-6;

/// A general-purpose MIP solver the orchestrator can hand a problem to.
///
/// Implementations must not hold on to the problem after returning; every
/// solve call gets its own freshly built backend model.
///
/// When `time_limit` is set the backend is expected to stop on its own once
/// it runs out, returning `Timeout` with its best assignment so far.
pub trait MipBackend: Send + Sync {
    fn name(&self) -> &str;
    fn solve(&self, problem: &MipProblem, time_limit: Option<Duration>) -> SolveOutcome;
}

/// Which `good_lp` solver to drive
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Pure Rust branch-and-bound, always available
    #[default]
    MicroLp,
    /// HiGHS through its C API
    #[cfg(feature = "highs")]
    Highs,
}

/// Adapter from [`MipProblem`] to the `good_lp` modelling layer
#[derive(Debug, Clone, Default)]
pub struct GoodLpBackend {
    kind: BackendKind,
}

impl GoodLpBackend {
    pub fn new(kind: BackendKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }
}

impl MipBackend for GoodLpBackend {
    fn name(&self) -> &str {
        match self.kind {
            BackendKind::MicroLp => "microlp",
            #[cfg(feature = "highs")]
            BackendKind::Highs => "highs",
        }
    }

    fn solve(&self, problem: &MipProblem, time_limit: Option<Duration>) -> SolveOutcome {
        if let Err(e) = problem.validate() {
            return SolveOutcome::Failed(e);
        }

        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = problem
            .variables
            .iter()
            .map(|name| vars.add(variable().binary().name(name.clone())))
            .collect();

        let objective = xs
            .iter()
            .zip(&problem.objective.coefficients)
            .filter(|(_, c)| **c != 0.0)
            .fold(Expression::from(0.0), |acc, (x, c)| acc + *c * *x);

        let unsolved = if problem.objective.minimize {
            vars.minimise(objective)
        } else {
            vars.maximise(objective)
        };

        debug!(
            "{}: {} binary variables, {} constraints",
            self.name(),
            xs.len(),
            problem.num_constraints()
        );

        match self.kind {
            BackendKind::MicroLp => run(unsolved.using(good_lp::microlp), &xs, problem, time_limit, self.name()),
            #[cfg(feature = "highs")]
            BackendKind::Highs => run(unsolved.using(good_lp::highs), &xs, problem, time_limit, self.name()),
        }
    }
}

fn run<M>(
    model: M,
    xs: &[Variable],
    problem: &MipProblem,
    time_limit: Option<Duration>,
    backend: &str,
) -> SolveOutcome
where
    M: SolverModel<Error = ResolutionError> + WithTimeLimit,
{
    let mut model = match time_limit {
        Some(limit) => model.with_time_limit(limit.as_secs_f64()),
        None => model,
    };
    for c in &problem.constraints {
        let lhs = c
            .terms
            .iter()
            .fold(Expression::from(0.0), |acc, &(i, coeff)| acc + coeff * xs[i]);
        let constraint = match c.op {
            ConstraintOp::Le => lhs.leq(c.rhs),
            ConstraintOp::Ge => lhs.geq(c.rhs),
            ConstraintOp::Eq => lhs.eq(c.rhs),
        };
        model.add_constraint(constraint);
    }

    match model.solve() {
        Ok(solution) => {
            let values: Vec<f64> = xs.iter().map(|&x| solution.value(x)).collect();
            let objective_value = problem.evaluate(&values);
            let status = solution.status();
            let assignment = Assignment {
                values,
                objective_value,
                optimal: matches!(status, LpStatus::Optimal),
            };
            match status {
                LpStatus::Optimal | LpStatus::GapLimit => SolveOutcome::Solved(assignment),
                LpStatus::TimeLimit => {
                    // HiGHS may stop before it has any feasible point
                    let feasible = problem
                        .violated_constraints(&assignment.values, FEASIBILITY_TOL)
                        .is_empty();
                    SolveOutcome::Timeout {
                        incumbent: feasible.then_some(assignment),
                    }
                }
            }
        }
        Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
        Err(ResolutionError::Unbounded) => SolveOutcome::Failed(SolverError::Unbounded),
        // microlp reports a limit hit before the first incumbent as an error
        Err(ResolutionError::Other(msg)) if time_limit.is_some() && msg.starts_with("Time limit") => {
            SolveOutcome::Timeout { incumbent: None }
        }
        Err(e) => SolveOutcome::Failed(SolverError::Backend {
            backend: backend.to_string(),
            message: e.to_string(),
        }),
    }
}
