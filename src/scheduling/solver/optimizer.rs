use crate::scheduling::model::{Assignment, ModelError, ProblemInstance};
use std::time::{Duration, Instant};
use strum_macros::Display;
use tokio_util::sync::CancellationToken;

/// Terminal state of a solve.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The search space was exhausted and the returned assignment is optimal.
    #[strum(to_string = "OPTIMAL")]
    Optimal,
    /// The budget ran out while holding a feasible assignment.
    #[strum(to_string = "FEASIBLE")]
    Feasible,
    /// The search space was exhausted without finding any feasible assignment.
    #[strum(to_string = "INFEASIBLE")]
    Infeasible,
    /// The budget ran out before any feasible assignment was found.
    #[strum(to_string = "UNKNOWN")]
    Unknown,
}

impl SolveStatus {
    /// Whether the search ran to completion, so the status is a proof and not an estimate.
    pub fn is_proven(self) -> bool { matches!(self, SolveStatus::Optimal | SolveStatus::Infeasible) }
}

/// Limits a single solve.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    time: Duration,
    cancel: CancellationToken,
    max_nodes: Option<u64>,
}

impl SearchBudget {
    pub fn new(time: Duration) -> Self {
        Self { time, cancel: CancellationToken::new(), max_nodes: None }
    }

    /// Replaces the cancellation token so an outer task can stop the search early.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Caps the number of explored search nodes. Node limits make budgets reproducible.
    pub fn with_node_limit(mut self, max_nodes: u64) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    pub fn time(&self) -> Duration { self.time }
    pub fn cancel_token(&self) -> &CancellationToken { &self.cancel }
    pub fn max_nodes(&self) -> Option<u64> { self.max_nodes }

    /// The instant after which a search started at `started` must stop.
    pub fn deadline(&self, started: Instant) -> Instant {
        started.checked_add(self.time).unwrap_or(started + Duration::from_secs(86_400 * 365))
    }
}

/// Counters collected during a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub incumbents: u32,
    pub elapsed: Duration,
    pub budget_exhausted: bool,
}

/// Outcome of [`Optimizer::solve`].
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub status: SolveStatus,
    /// Best assignment found. Always present for [`SolveStatus::Optimal`] and
    /// [`SolveStatus::Feasible`], never otherwise.
    pub assignment: Option<Assignment>,
    pub objective: Option<i64>,
    pub stats: SearchStats,
}

/// A solving strategy for [`ProblemInstance`]s.
///
/// Implementations must only return assignments that satisfy every constraint, may only
/// report [`SolveStatus::Optimal`] after proving no better assignment exists, and must
/// return within the budget.
pub trait Optimizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Maximizes the objective of `instance` within `budget`.
    ///
    /// # Errors
    /// - [`ModelError`] if the instance contains something this optimizer cannot reason about.
    fn solve(&self, instance: &ProblemInstance, budget: &SearchBudget) -> Result<SolverResult, ModelError>;
}
