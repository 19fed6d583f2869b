use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::backend::{GoodLpBackend, MipBackend};
use crate::problem::MipProblem;
use crate::solution::{SolveOutcome, SolverError};

/// Slack past the budget before the caller stops waiting on a backend
const DEADLINE_GRACE: Duration = Duration::from_millis(250);

/// Hands problems to a [`MipBackend`] and enforces an optional wall-clock budget.
///
/// The budget is passed to the backend, which stops itself and reports its
/// incumbent. The backend also runs on a worker thread, and the caller stops
/// waiting shortly after the budget in case the backend ignores it. A backend
/// panic becomes `Failed` on both paths.
#[derive(Clone)]
pub struct Solver {
    backend: Arc<dyn MipBackend>,
    time_limit: Option<Duration>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            backend: Arc::new(GoodLpBackend::default()),
            time_limit: None,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: impl MipBackend + 'static) -> Self {
        self.backend = Arc::new(backend);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn solve(&self, problem: &MipProblem) -> SolveOutcome {
        let started = Instant::now();
        info!(
            "solving with {} ({} variables, {} constraints, budget {:?})",
            self.backend.name(),
            problem.num_variables(),
            problem.num_constraints(),
            self.time_limit
        );

        let outcome = match self.time_limit {
            None => guarded(self.backend.as_ref(), problem, None),
            Some(limit) => self.solve_with_budget(problem.clone(), limit),
        };

        match &outcome {
            SolveOutcome::Solved(a) => info!(
                "solved in {:.2?}, objective {:.3}",
                started.elapsed(),
                a.objective_value
            ),
            SolveOutcome::Infeasible => warn!("model proven infeasible after {:.2?}", started.elapsed()),
            SolveOutcome::Timeout { incumbent } => warn!(
                "time budget exhausted after {:.2?} (incumbent: {})",
                started.elapsed(),
                if incumbent.is_some() { "yes" } else { "none" }
            ),
            SolveOutcome::Failed(e) => warn!("solver failed: {}", e),
        }
        outcome
    }

    fn solve_with_budget(&self, problem: MipProblem, limit: Duration) -> SolveOutcome {
        let (tx, rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);

        let spawned = thread::Builder::new()
            .name("kickoff-solve".into())
            .spawn(move || {
                let _ = tx.send(guarded(backend.as_ref(), &problem, Some(limit)));
            });
        if let Err(e) = spawned {
            return SolveOutcome::Failed(SolverError::Backend {
                backend: self.backend.name().to_string(),
                message: format!("cannot spawn worker: {}", e),
            });
        }

        let deadline = limit + DEADLINE_GRACE.max(limit / 10);
        match rx.recv_timeout(deadline) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "{} ignored its {:?} budget, abandoning the worker",
                    self.backend.name(),
                    limit
                );
                SolveOutcome::Timeout { incumbent: None }
            }
            Err(RecvTimeoutError::Disconnected) => SolveOutcome::Failed(SolverError::WorkerLost),
        }
    }
}

/// Run the backend, turning a panic into `Failed`
fn guarded(backend: &dyn MipBackend, problem: &MipProblem, time_limit: Option<Duration>) -> SolveOutcome {
    catch_unwind(AssertUnwindSafe(|| backend.solve(problem, time_limit))).unwrap_or_else(|payload| {
        SolveOutcome::Failed(SolverError::Backend {
            backend: backend.name().to_string(),
            message: format!("backend panicked: {}", panic_message(&*payload)),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown cause"
    }
}
