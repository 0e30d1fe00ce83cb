use super::schedule::{Schedule, ScheduleDecision, UnselectedRequest};
use crate::mission::SatelliteSpec;
use crate::scheduling::model::{Assignment, ScheduleModel};

/// Turns a solver assignment back into a [`Schedule`].
pub struct ResultAssembler;

impl ResultAssembler {
    /// Assembles the schedule for `assignment`.
    ///
    /// Only `selected` and `start` are read from the assignment. Durations, memory, end
    /// times and travel gaps are recomputed from `satellite`, with the same formulas the
    /// model was built with.
    pub fn assemble(model: &ScheduleModel, assignment: &Assignment, satellite: &SatelliteSpec) -> Schedule {
        let mut chosen = Vec::new();
        let mut unselected = Vec::new();
        for (req, vars) in model.requests().iter().zip(model.vars()) {
            if assignment.value(vars.selected) {
                chosen.push((assignment.int(vars.start), req));
            } else {
                unselected.push(UnselectedRequest {
                    location: req.id().to_string(),
                    priority: req.priority(),
                });
            }
        }
        chosen.sort_by_key(|(start, _)| *start);

        let mut previous: Option<(f64, f64)> = None;
        let decisions = chosen
            .into_iter()
            .map(|(start_time, req)| {
                let duration_s = satellite.capture_duration_s(req.area_km2());
                let travel_from_previous_s =
                    previous.map_or(0, |from| satellite.travel_time_s(from, req.coordinates()));
                previous = Some(req.coordinates());
                ScheduleDecision {
                    location: req.id().to_string(),
                    coordinates: req.coordinates(),
                    priority: req.priority(),
                    time_window_sec: req.window(),
                    start_time,
                    end_time: start_time + duration_s,
                    duration_s,
                    memory_gb: satellite.memory_usage_gb(req.area_km2()),
                    travel_from_previous_s,
                }
            })
            .collect();
        Schedule::new(decisions, unselected, satellite.memory_capacity_gb())
    }
}
