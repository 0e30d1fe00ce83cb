use super::{
    assembly::{ResultAssembler, Schedule, ScheduleViolation},
    model::{ModelError, ScheduleModelBuilder},
    solver::{Optimizer, SearchBudget, SearchStats, SolveStatus},
};
use crate::mission::{ImagingRequest, SatelliteSpec, ValidationError, validate_requests};
use crate::visibility::{FilterRejection, VisibilityFilter};
use crate::{error, info, warn};
use std::{sync::Arc, time::Duration};
use strum_macros::Display;

/// Why a request never reached the optimizer.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum RequestRejection {
    Invalid(ValidationError),
    Filtered(FilterRejection),
}

/// The four distinguishable results of a planning run.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// Proven best schedule.
    Optimal(Schedule),
    /// Best schedule found before the budget ran out. Retrying with more time may improve it.
    Feasible(Schedule),
    /// No schedule satisfies the constraints.
    Infeasible,
    /// The budget ran out before any schedule was found.
    Unknown,
}

impl PlanOutcome {
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            PlanOutcome::Optimal(s) | PlanOutcome::Feasible(s) => Some(s),
            PlanOutcome::Infeasible | PlanOutcome::Unknown => None,
        }
    }

    pub fn status(&self) -> SolveStatus {
        match self {
            PlanOutcome::Optimal(_) => SolveStatus::Optimal,
            PlanOutcome::Feasible(_) => SolveStatus::Feasible,
            PlanOutcome::Infeasible => SolveStatus::Infeasible,
            PlanOutcome::Unknown => SolveStatus::Unknown,
        }
    }
}

/// Result of [`Planner::plan`].
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub outcome: PlanOutcome,
    /// Requests dropped before the solve by identifier. Validation failures come first,
    /// then visibility rejections, each group in input order.
    pub rejected: Vec<(String, RequestRejection)>,
    pub stats: SearchStats,
}

/// Failures that abort a whole planning run.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum PlanError {
    Invalid(ValidationError),
    Model(ModelError),
    /// The solver task panicked or was dropped.
    SolverAborted,
    /// The optimizer returned an assignment that fails the schedule invariants.
    Unsound(ScheduleViolation),
}

impl std::error::Error for PlanError {}

impl From<ModelError> for PlanError {
    fn from(value: ModelError) -> Self { PlanError::Model(value) }
}

/// Runs validation, the optional visibility pre-filter, model construction, the
/// optimizer and result assembly for one request batch.
pub struct Planner {
    optimizer: Arc<dyn Optimizer>,
    filter: Option<VisibilityFilter>,
}

impl Planner {
    /// Time granted to the solver beyond its budget before it is cancelled from outside.
    const CANCEL_GRACE: Duration = Duration::from_millis(250);

    pub fn new(optimizer: Arc<dyn Optimizer>) -> Self { Self { optimizer, filter: None } }

    /// Narrows every request to a visible sub-window before solving.
    pub fn with_visibility_filter(mut self, filter: VisibilityFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Plans captures for `requests`.
    ///
    /// Invalid or filtered requests are reported in [`PlanReport::rejected`] and never
    /// abort the run. The optimizer runs on the blocking pool. Should it overrun its
    /// budget, it is cancelled through the budget's token.
    ///
    /// # Errors
    /// - [`PlanError`] if the satellite record is invalid, the model is rejected by the
    ///   optimizer or the solver task fails.
    pub async fn plan(
        &self,
        satellite: &SatelliteSpec,
        requests: Vec<ImagingRequest>,
        budget: SearchBudget,
    ) -> Result<PlanReport, PlanError> {
        satellite.validate().map_err(PlanError::Invalid)?;
        let (valid, invalid) = validate_requests(&requests);
        let mut rejected: Vec<(String, RequestRejection)> =
            invalid.into_iter().map(|(id, e)| (id, RequestRejection::Invalid(e))).collect();

        let admitted = match &self.filter {
            Some(filter) => {
                let report = filter.apply(satellite, valid).await;
                rejected.extend(
                    report.rejected.into_iter().map(|(id, r)| (id, RequestRejection::Filtered(r))),
                );
                report.admitted
            }
            None => valid,
        };

        let model = ScheduleModelBuilder::build(satellite, &admitted).map_err(PlanError::Invalid)?;
        let instance = model.instance().clone();
        let optimizer = Arc::clone(&self.optimizer);
        let cancel = budget.cancel_token().clone();
        let limit = budget.time() + Self::CANCEL_GRACE;
        info!("Solving {} requests with {} for at most {:?}.", admitted.len(), optimizer.name(), budget.time());

        let mut handle = tokio::task::spawn_blocking(move || optimizer.solve(&instance, &budget));
        let joined = tokio::select! {
            joined = &mut handle => joined,
            () = tokio::time::sleep(limit) => {
                warn!("Solver overran its budget, cancelling.");
                cancel.cancel();
                handle.await
            }
        };
        let result = joined.map_err(|e| {
            error!("Solver task failed: {e}");
            PlanError::SolverAborted
        })??;

        let outcome = match (result.status, &result.assignment) {
            (SolveStatus::Optimal | SolveStatus::Feasible, Some(assignment)) => {
                let schedule = ResultAssembler::assemble(&model, assignment, satellite);
                schedule.verify(satellite).map_err(|v| {
                    error!("Solver returned an unsound schedule: {v}");
                    PlanError::Unsound(v)
                })?;
                if result.status == SolveStatus::Optimal {
                    PlanOutcome::Optimal(schedule)
                } else {
                    PlanOutcome::Feasible(schedule)
                }
            }
            (SolveStatus::Infeasible, _) => PlanOutcome::Infeasible,
            _ => PlanOutcome::Unknown,
        };
        info!(
            "Planning finished with {}: {} rejected before solving.",
            outcome.status(),
            rejected.len()
        );
        Ok(PlanReport { outcome, rejected, stats: result.stats })
    }
}
