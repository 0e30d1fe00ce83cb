use super::{
    constraint::Comparison,
    problem_instance::ProblemInstance,
    variable::{BoolVar, IntVar, Term},
};
use crate::info;
use crate::mission::{ImagingRequest, SatelliteSpec, ValidationError};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// Decision variables belonging to a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestVars {
    pub selected: BoolVar,
    pub start: IntVar,
    /// `start + duration` when selected, `0` otherwise. Its domain spans both, even for
    /// windows at negative times.
    pub end: IntVar,
}

/// A [`ProblemInstance`] together with the mapping back to the requests it was built from.
#[derive(Debug, Clone)]
pub struct ScheduleModel {
    instance: ProblemInstance,
    requests: Vec<ImagingRequest>,
    vars: Vec<RequestVars>,
    /// `order[(i, j)]` with `i < j` is true when request `i` is captured before `j`.
    order: HashMap<(usize, usize), BoolVar>,
    durations: Vec<i64>,
    memory_scaled: Vec<i64>,
    capacity_scaled: i64,
    travel: Vec<Vec<i64>>,
    horizon: i64,
}

impl ScheduleModel {
    pub fn instance(&self) -> &ProblemInstance { &self.instance }
    pub fn into_instance(self) -> ProblemInstance { self.instance }
    pub fn requests(&self) -> &[ImagingRequest] { &self.requests }
    pub fn vars(&self) -> &[RequestVars] { &self.vars }
    pub fn order_var(&self, i: usize, j: usize) -> Option<BoolVar> {
        self.order.get(&(i.min(j), i.max(j))).copied()
    }
    pub fn duration(&self, i: usize) -> i64 { self.durations[i] }
    pub fn memory_scaled(&self, i: usize) -> i64 { self.memory_scaled[i] }
    pub fn capacity_scaled(&self) -> i64 { self.capacity_scaled }
    pub fn travel(&self, i: usize, j: usize) -> i64 { self.travel[i][j] }
    pub fn horizon(&self) -> i64 { self.horizon }
}

/// Translates a satellite and a batch of requests into a solver-agnostic [`ProblemInstance`].
pub struct ScheduleModelBuilder;

impl ScheduleModelBuilder {
    /// Integer units per gigabyte used for the capacity constraint.
    pub const MEMORY_SCALE: f64 = 1_000_000.0;

    /// Scales a memory amount in gigabytes to integer capacity units, rounding to nearest.
    #[allow(clippy::cast_possible_truncation)]
    pub fn scale_memory(gb: f64) -> i64 { (gb * Self::MEMORY_SCALE).round() as i64 }

    /// Builds the scheduling model for `requests`.
    ///
    /// # Arguments
    /// - `satellite`: The capability record supplying durations, memory and travel speed.
    /// - `requests`: The requests to schedule. They must be individually valid and carry
    ///   unique identifiers.
    ///
    /// # Returns
    /// - A [`ScheduleModel`] whose variables are indexed like `requests`.
    /// - A [`ValidationError`] if the satellite or any request is invalid.
    pub fn build(
        satellite: &SatelliteSpec,
        requests: &[ImagingRequest],
    ) -> Result<ScheduleModel, ValidationError> {
        satellite.validate()?;
        let mut ids = HashSet::new();
        for req in requests {
            req.validate()?;
            if !ids.insert(req.id()) {
                return Err(ValidationError::DuplicateRequestId);
            }
        }

        let recal = satellite.recalibration_s();
        let horizon = requests.iter().map(ImagingRequest::window_end).max().unwrap_or(0) + recal;
        let durations: Vec<i64> =
            requests.iter().map(|r| satellite.capture_duration_s(r.area_km2())).collect();
        let memory_scaled: Vec<i64> = requests
            .iter()
            .map(|r| Self::scale_memory(satellite.memory_usage_gb(r.area_km2())))
            .collect();
        let capacity_scaled = Self::scale_memory(satellite.memory_capacity_gb());
        let travel: Vec<Vec<i64>> = requests
            .iter()
            .map(|a| {
                requests
                    .iter()
                    .map(|b| satellite.travel_time_s(a.coordinates(), b.coordinates()))
                    .collect()
            })
            .collect();
        // windows may lie before zero, so the end domain must cover both 0 (unselected)
        // and every reachable end when selected
        let end_lb = requests
            .iter()
            .zip(&durations)
            .map(|(r, &d)| r.window_start() + d)
            .fold(0, i64::min);
        let end_ub = horizon.max(0);

        let mut instance = ProblemInstance::new();
        let mut vars = Vec::with_capacity(requests.len());
        for (req, &dur) in requests.iter().zip(&durations) {
            let id = req.id();
            let (ws, we) = req.window();
            let selected = instance.new_bool_var(&format!("selected_{id}"));
            let start = instance.new_int_var(&format!("start_{id}"), ws, we);
            let end = instance.new_int_var(&format!("end_{id}"), end_lb, end_ub);
            instance
                .add(
                    &format!("end_def_{id}"),
                    vec![Term::Int(1, end), Term::Int(-1, start)],
                    Comparison::Eq,
                    dur,
                )
                .only_enforce_if(&[selected.lit()]);
            instance
                .add(&format!("end_unset_{id}"), vec![Term::Int(1, end)], Comparison::Eq, 0)
                .only_enforce_if(&[!selected]);
            instance
                .add(&format!("window_{id}"), vec![Term::Int(1, start)], Comparison::Le, we - dur)
                .only_enforce_if(&[selected.lit()]);
            vars.push(RequestVars { selected, start, end });
        }

        let mut order = HashMap::new();
        for (i, j) in (0..requests.len()).tuple_combinations() {
            let (a, b) = (requests[i].id(), requests[j].id());
            let (vi, vj) = (vars[i], vars[j]);
            let before = instance.new_bool_var(&format!("order_{a}_{b}"));
            instance
                .add(
                    &format!("gap_{a}_{b}"),
                    vec![Term::Int(1, vj.start), Term::Int(-1, vi.start)],
                    Comparison::Ge,
                    durations[i] + recal + travel[i][j],
                )
                .only_enforce_if(&[vi.selected.lit(), vj.selected.lit(), before.lit()]);
            instance
                .add(
                    &format!("gap_{b}_{a}"),
                    vec![Term::Int(1, vi.start), Term::Int(-1, vj.start)],
                    Comparison::Ge,
                    durations[j] + recal + travel[j][i],
                )
                .only_enforce_if(&[vi.selected.lit(), vj.selected.lit(), !before]);
            order.insert((i, j), before);
        }

        let memory_terms =
            vars.iter().zip(&memory_scaled).map(|(v, &m)| Term::Bool(m, v.selected)).collect();
        instance.add("memory_capacity", memory_terms, Comparison::Le, capacity_scaled);
        instance.maximize(vars.iter().zip(requests).map(|(v, r)| (r.priority(), v.selected)).collect());

        info!(
            "Built schedule model: {} requests, {} bool vars, {} int vars, {} constraints, horizon {horizon}s.",
            requests.len(),
            instance.n_bools(),
            instance.n_ints(),
            instance.constraints().len()
        );
        Ok(ScheduleModel {
            instance,
            requests: requests.to_vec(),
            vars,
            order,
            durations,
            memory_scaled,
            capacity_scaled,
            travel,
            horizon,
        })
    }
}
