//! This module provides the capture scheduling pipeline: model construction, optimization
//! and assembly of the final [`Schedule`].

pub mod assembly;
pub mod model;
mod planner;
pub mod solver;

#[cfg(test)]
mod tests;

pub use assembly::{ResultAssembler, Schedule, ScheduleDecision, UnselectedRequest};
pub use model::{ScheduleModel, ScheduleModelBuilder};
pub use planner::{PlanError, PlanOutcome, PlanReport, Planner, RequestRejection};
pub use solver::{BranchAndBound, Optimizer, SearchBudget, SolveStatus};
