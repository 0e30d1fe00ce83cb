use crate::mission::SatelliteSpec;
use crate::scheduling::model::ScheduleModelBuilder;
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use strum_macros::Display;

/// A selected request with its derived timing.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct ScheduleDecision {
    pub location: String,
    pub coordinates: (f64, f64),
    pub priority: i64,
    pub time_window_sec: (i64, i64),
    pub start_time: i64,
    /// Always `start_time + duration_s`.
    pub end_time: i64,
    pub duration_s: i64,
    pub memory_gb: f64,
    /// Travel time from the previously scheduled capture, `0` for the first one.
    pub travel_from_previous_s: i64,
}

/// A request left out of the schedule. Carries no timing and no reason.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct UnselectedRequest {
    pub location: String,
    pub priority: i64,
}

/// Ordered capture plan produced by a single solve.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct Schedule {
    /// Selected captures by ascending start time.
    decisions: Vec<ScheduleDecision>,
    unselected: Vec<UnselectedRequest>,
    total_priority: i64,
    total_memory_gb: f64,
    memory_capacity_gb: f64,
}

/// A broken schedule invariant, naming the offending requests.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ScheduleViolation {
    CapacityExceeded,
    OutsideWindow(String),
    GapTooShort(String, String),
    InconsistentEndTime(String),
}

impl std::error::Error for ScheduleViolation {}

impl Schedule {
    pub(super) fn new(
        mut decisions: Vec<ScheduleDecision>,
        unselected: Vec<UnselectedRequest>,
        memory_capacity_gb: f64,
    ) -> Self {
        decisions.sort_by_key(|d| d.start_time);
        let total_priority = decisions.iter().map(|d| d.priority).sum();
        let total_memory_gb = decisions.iter().map(|d| d.memory_gb).sum();
        Self { decisions, unselected, total_priority, total_memory_gb, memory_capacity_gb }
    }

    pub fn decisions(&self) -> &[ScheduleDecision] { &self.decisions }
    pub fn unselected(&self) -> &[UnselectedRequest] { &self.unselected }
    pub fn total_priority(&self) -> i64 { self.total_priority }
    pub fn total_memory_gb(&self) -> f64 { self.total_memory_gb }
    pub fn memory_capacity_gb(&self) -> f64 { self.memory_capacity_gb }
    pub fn is_empty(&self) -> bool { self.decisions.is_empty() }

    /// Re-checks capacity, window and ordering invariants against `satellite`.
    ///
    /// Memory is compared in the same integer units the model uses, so rounding cannot
    /// make a schedule accepted by the solver fail here.
    pub fn verify(&self, satellite: &SatelliteSpec) -> Result<(), ScheduleViolation> {
        let used: i64 =
            self.decisions.iter().map(|d| ScheduleModelBuilder::scale_memory(d.memory_gb)).sum();
        if used > ScheduleModelBuilder::scale_memory(satellite.memory_capacity_gb()) {
            return Err(ScheduleViolation::CapacityExceeded);
        }
        for d in &self.decisions {
            if d.end_time != d.start_time + d.duration_s {
                return Err(ScheduleViolation::InconsistentEndTime(d.location.clone()));
            }
            let (ws, we) = d.time_window_sec;
            if d.start_time < ws || d.end_time > we {
                return Err(ScheduleViolation::OutsideWindow(d.location.clone()));
            }
        }
        for (a, b) in self.decisions.iter().tuple_combinations() {
            let travel = satellite.travel_time_s(a.coordinates, b.coordinates);
            if b.start_time < a.end_time + satellite.recalibration_s() + travel {
                return Err(ScheduleViolation::GapTooShort(a.location.clone(), b.location.clone()));
            }
        }
        Ok(())
    }
}

impl Display for ScheduleDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<12} start {:>6}s  end {:>6}s  travel {:>4}s  priority {}  memory {:.2}GB",
            self.location,
            self.start_time,
            self.end_time,
            self.travel_from_previous_s,
            self.priority,
            self.memory_gb
        )
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for d in &self.decisions {
            writeln!(f, "{d}")?;
        }
        if !self.unselected.is_empty() {
            let names = self.unselected.iter().map(|u| u.location.as_str()).join(", ");
            writeln!(f, "unselected: {names}")?;
        }
        write!(
            f,
            "total priority {}, memory {:.2}/{:.2}GB",
            self.total_priority, self.total_memory_gb, self.memory_capacity_gb
        )
    }
}
