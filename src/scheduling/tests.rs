use super::{
    BranchAndBound, Optimizer, PlanOutcome, Planner, RequestRejection, ResultAssembler,
    ScheduleModelBuilder, SearchBudget, SolveStatus,
    model::{Comparison, ModelError, ProblemInstance, Term},
};
use crate::mission::{ImagingRequest, SatelliteSpec, ValidationError};
use crate::orbit::{CircularOrbit, PositionSource};
use crate::test_fixtures::{demo_requests, demo_satellite};
use crate::visibility::{FilterRejection, VisibilityConfig, VisibilityFilter};
use itertools::Itertools;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

fn budget() -> SearchBudget { SearchBudget::new(Duration::from_secs(30)) }

/// Whether `order` can be captured back to back within every window, starting each
/// capture as early as possible.
fn sequence_fits(sat: &SatelliteSpec, order: &[&ImagingRequest]) -> bool {
    let mut placed: Vec<(i64, i64, (f64, f64))> = Vec::new();
    for req in order {
        let dur = sat.capture_duration_s(req.area_km2());
        let start = placed
            .iter()
            .map(|(_, end, from)| end + sat.recalibration_s() + sat.travel_time_s(*from, req.coordinates()))
            .fold(req.window_start(), i64::max);
        if start + dur > req.window_end() {
            return false;
        }
        placed.push((start, start + dur, req.coordinates()));
    }
    true
}

/// Best total priority over all subsets and capture orders.
fn brute_force_best(sat: &SatelliteSpec, requests: &[ImagingRequest]) -> i64 {
    let capacity = ScheduleModelBuilder::scale_memory(sat.memory_capacity_gb());
    requests
        .iter()
        .powerset()
        .filter(|subset| {
            let used: i64 = subset
                .iter()
                .map(|r| ScheduleModelBuilder::scale_memory(sat.memory_usage_gb(r.area_km2())))
                .sum();
            used <= capacity
        })
        .filter(|subset| {
            subset.is_empty()
                || subset.iter().copied().permutations(subset.len()).any(|p| sequence_fits(sat, &p))
        })
        .map(|subset| subset.iter().map(|r| r.priority()).sum())
        .max()
        .unwrap_or(0)
}

fn random_requests(rng: &mut StdRng, n: usize) -> Vec<ImagingRequest> {
    (0..n)
        .map(|i| {
            let start = rng.random_range(0..1500);
            ImagingRequest::new(
                &format!("R{i}"),
                (rng.random_range(-60.0..60.0), rng.random_range(-180.0..180.0)),
                rng.random_range(1..=5),
                rng.random_range(2.0..14.0),
                (start, start + rng.random_range(20..600)),
            )
        })
        .collect()
}

#[test]
fn test_model_shape_for_demo_catalog() {
    let model = ScheduleModelBuilder::build(&demo_satellite(), &demo_requests()).unwrap();
    let instance = model.instance();
    assert_eq!(instance.n_bools(), 4 + 6);
    assert_eq!(instance.n_ints(), 8);
    assert_eq!(instance.constraints().len(), 4 * 3 + 6 * 2 + 1);
    assert_eq!(model.horizon(), 1500 + 30);
    assert_eq!((0..4).map(|i| model.duration(i)).collect::<Vec<_>>(), vec![35, 28, 28, 21]);
    assert_eq!(model.memory_scaled(0), 1_500_000);
    assert_eq!(model.capacity_scaled(), 5_000_000);
    assert_eq!(model.travel(0, 3), model.travel(3, 0));
    assert_eq!(model.order_var(1, 2), model.order_var(2, 1));
    assert!(model.order_var(0, 0).is_none());
    assert!(instance.validate().is_ok());
}

#[test]
fn test_builder_rejects_invalid_input() {
    let sat = demo_satellite();
    let mut requests = demo_requests();
    requests.push(requests[0].clone());
    assert_eq!(
        ScheduleModelBuilder::build(&sat, &requests).unwrap_err(),
        ValidationError::DuplicateRequestId
    );
    let slow = SatelliteSpec::new(5.0, 0.15, 3.5, 120.0, 30, 0.0);
    assert!(matches!(
        ScheduleModelBuilder::build(&slow, &demo_requests()),
        Err(ValidationError::NonPositiveSatelliteParameter("speed_kms_per_s"))
    ));
}

#[test]
fn test_demo_catalog_is_optimal_and_matches_oracle() {
    let sat = demo_satellite();
    let requests = demo_requests();
    let model = ScheduleModelBuilder::build(&sat, &requests).unwrap();
    let result = BranchAndBound.solve(model.instance(), &budget()).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.objective, Some(brute_force_best(&sat, &requests)));
    assert_eq!(result.objective, Some(9));

    let assignment = result.assignment.unwrap();
    model.instance().check(&assignment).unwrap();
    let schedule = ResultAssembler::assemble(&model, &assignment, &sat);
    schedule.verify(&sat).unwrap();
    assert_eq!(schedule.decisions().len(), 4);
    assert!(schedule.unselected().is_empty());
    assert_eq!(schedule.total_priority(), 9);
    assert!((schedule.total_memory_gb() - 4.8).abs() < 1e-9);
}

#[test]
fn test_assembled_decisions_are_derived_from_starts() {
    let sat = demo_satellite();
    let model = ScheduleModelBuilder::build(&sat, &demo_requests()).unwrap();
    let assignment = BranchAndBound.solve(model.instance(), &budget()).unwrap().assignment.unwrap();
    let schedule = ResultAssembler::assemble(&model, &assignment, &sat);
    let decisions = schedule.decisions();
    assert!(decisions.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    assert_eq!(decisions[0].travel_from_previous_s, 0);
    for d in decisions {
        assert_eq!(d.end_time, d.start_time + d.duration_s);
    }
    for pair in decisions.windows(2) {
        let travel = sat.travel_time_s(pair[0].coordinates, pair[1].coordinates);
        assert_eq!(pair[1].travel_from_previous_s, travel);
        assert!(pair[1].start_time >= pair[0].end_time + sat.recalibration_s() + travel);
    }
    let printed = schedule.to_string();
    assert!(decisions.iter().all(|d| printed.contains(&d.location)));
}

#[test]
fn test_capacity_limits_selection() {
    let tight = SatelliteSpec::new(3.0, 0.15, 3.5, 120.0, 30, 50.0);
    let requests = demo_requests();
    let model = ScheduleModelBuilder::build(&tight, &requests).unwrap();
    let result = BranchAndBound.solve(model.instance(), &budget()).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    // Tokyo and New-York: 1.5 + 0.9 GB
    assert_eq!(result.objective, Some(6));
    assert_eq!(result.objective, Some(brute_force_best(&tight, &requests)));
    let schedule = ResultAssembler::assemble(&model, &result.assignment.unwrap(), &tight);
    schedule.verify(&tight).unwrap();
    assert!(schedule.total_memory_gb() <= 3.0 + 1e-9);
    assert_eq!(schedule.unselected().len(), 2);
}

#[test]
fn test_exactly_filled_capacity_is_not_a_violation() {
    // capacity is compared in integer units, so float summation order cannot tip it over
    let exact = SatelliteSpec::new(4.8, 0.15, 3.5, 120.0, 30, 50.0);
    let model = ScheduleModelBuilder::build(&exact, &demo_requests()).unwrap();
    let result = BranchAndBound.solve(model.instance(), &budget()).unwrap();
    assert_eq!(result.objective, Some(9));
    let schedule = ResultAssembler::assemble(&model, &result.assignment.unwrap(), &exact);
    schedule.verify(&exact).unwrap();
}

#[test]
fn test_window_shorter_than_capture_is_never_selected() {
    let sat = demo_satellite();
    let requests = vec![
        ImagingRequest::new("Narrow", (10.0, 10.0), 100, 10.0, (0, 34)),
        ImagingRequest::new("Wide", (10.0, 11.0), 1, 10.0, (0, 500)),
    ];
    let model = ScheduleModelBuilder::build(&sat, &requests).unwrap();
    let result = BranchAndBound.solve(model.instance(), &budget()).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.objective, Some(1));
}

#[test]
fn test_windows_before_time_zero_are_schedulable() {
    let sat = demo_satellite();
    let early = ImagingRequest::new("Early", (10.0, 10.0), 5, 10.0, (-200, -50));
    let late = ImagingRequest::new("Late", (10.0, 11.0), 1, 10.0, (0, 400));
    for requests in [vec![early.clone(), late], vec![early]] {
        let model = ScheduleModelBuilder::build(&sat, &requests).unwrap();
        let result = BranchAndBound.solve(model.instance(), &budget()).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.objective, Some(brute_force_best(&sat, &requests)));
        let assignment = result.assignment.unwrap();
        model.instance().check(&assignment).unwrap();
        let schedule = ResultAssembler::assemble(&model, &assignment, &sat);
        schedule.verify(&sat).unwrap();
        assert_eq!(schedule.decisions()[0].location, "Early");
        assert!(schedule.decisions()[0].start_time < 0);
    }
}

#[test]
fn test_random_instances_match_oracle() {
    let sat = demo_satellite();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..25 {
        let n = rng.random_range(2..=6);
        let requests = random_requests(&mut rng, n);
        let model = ScheduleModelBuilder::build(&sat, &requests).unwrap();
        let result = BranchAndBound.solve(model.instance(), &budget()).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal, "round {round}");
        assert_eq!(result.objective, Some(brute_force_best(&sat, &requests)), "round {round}");
        let assignment = result.assignment.unwrap();
        model.instance().check(&assignment).unwrap();
        ResultAssembler::assemble(&model, &assignment, &sat).verify(&sat).unwrap();
    }
}

#[test]
fn test_more_search_never_lowers_objective() {
    let sat = demo_satellite();
    let mut rng = StdRng::seed_from_u64(42);
    let requests = random_requests(&mut rng, 6);
    let model = ScheduleModelBuilder::build(&sat, &requests).unwrap();
    let mut previous = i64::MIN;
    for limit in (0..14).map(|k| 1u64 << k) {
        let result = BranchAndBound.solve(model.instance(), &budget().with_node_limit(limit)).unwrap();
        let objective = result.objective.unwrap_or(i64::MIN);
        assert!(objective >= previous, "node limit {limit}");
        assert!(result.stats.nodes <= limit);
        if let Some(assignment) = &result.assignment {
            model.instance().check(assignment).unwrap();
        }
        previous = objective;
    }
    let full = BranchAndBound.solve(model.instance(), &budget()).unwrap();
    assert!(full.objective.unwrap_or(i64::MIN) >= previous);
}

#[test]
fn test_repeated_solves_agree() {
    let model = ScheduleModelBuilder::build(&demo_satellite(), &demo_requests()).unwrap();
    let a = BranchAndBound.solve(model.instance(), &budget()).unwrap();
    let b = BranchAndBound.solve(model.instance(), &budget()).unwrap();
    assert_eq!(a.objective, b.objective);
    assert_eq!(a.stats.nodes, b.stats.nodes);
}

#[test]
fn test_exhausted_budget_without_solution_is_unknown() {
    let model = ScheduleModelBuilder::build(&demo_satellite(), &demo_requests()).unwrap();
    let result = BranchAndBound.solve(model.instance(), &SearchBudget::new(Duration::ZERO)).unwrap();
    assert_eq!(result.status, SolveStatus::Unknown);
    assert!(result.assignment.is_none());
    assert!(result.stats.budget_exhausted);
    assert!(!result.status.is_proven());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let cancelled = budget().with_cancel(cancel);
    let result = BranchAndBound.solve(model.instance(), &cancelled).unwrap();
    assert_eq!(result.status, SolveStatus::Unknown);
}

#[test]
fn test_budget_expiry_with_incumbent_is_feasible() {
    let mut instance = ProblemInstance::new();
    let vars: Vec<_> = (0..12).map(|i| instance.new_bool_var(&format!("b{i}"))).collect();
    let terms = vars.iter().zip(3..).map(|(v, w)| Term::Bool(w, *v)).collect();
    instance.add("knapsack", terms, Comparison::Le, 40);
    instance.maximize(vars.iter().zip(0i64..).map(|(v, i)| ((i * 7) % 5 + 1, *v)).collect());
    let exact = BranchAndBound.solve(&instance, &budget()).unwrap();
    assert_eq!(exact.status, SolveStatus::Optimal);
    assert!(exact.stats.nodes > 20);

    let cut = BranchAndBound.solve(&instance, &budget().with_node_limit(20)).unwrap();
    assert!(cut.stats.budget_exhausted);
    assert_eq!(cut.status, SolveStatus::Feasible);
    assert!(cut.objective <= exact.objective);
    instance.check(&cut.assignment.unwrap()).unwrap();
}

#[test]
fn test_contradictory_instances_are_infeasible() {
    let mut instance = ProblemInstance::new();
    let x = instance.new_int_var("x", 0, 10);
    instance.add("too_high", vec![Term::Int(1, x)], Comparison::Ge, 20);
    let result = BranchAndBound.solve(&instance, &budget()).unwrap();
    assert_eq!(result.status, SolveStatus::Infeasible);
    assert!(result.assignment.is_none());
    assert!(result.status.is_proven());

    let mut instance = ProblemInstance::new();
    let a = instance.new_bool_var("a");
    let b = instance.new_bool_var("b");
    instance.add("at_least_three", vec![Term::Bool(1, a), Term::Bool(1, b)], Comparison::Ge, 3);
    instance.maximize(vec![(1, a)]);
    assert_eq!(BranchAndBound.solve(&instance, &budget()).unwrap().status, SolveStatus::Infeasible);
}

#[test]
fn test_conditional_cycle_forces_literal() {
    // x - y >= 5 and y - x >= 5 cannot both hold, so `both` must be false
    let mut instance = ProblemInstance::new();
    let x = instance.new_int_var("x", 0, 100);
    let y = instance.new_int_var("y", 0, 100);
    let both = instance.new_bool_var("both");
    let other = instance.new_bool_var("other");
    instance
        .add("x_after_y", vec![Term::Int(1, x), Term::Int(-1, y)], Comparison::Ge, 5)
        .only_enforce_if(&[both.lit()]);
    instance
        .add("y_after_x", vec![Term::Int(1, y), Term::Int(-1, x)], Comparison::Ge, 5)
        .only_enforce_if(&[both.lit()]);
    instance.maximize(vec![(10, both), (1, other)]);
    let result = BranchAndBound.solve(&instance, &budget()).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.objective, Some(1));
    let assignment = result.assignment.unwrap();
    assert!(!assignment.value(both));
    instance.check(&assignment).unwrap();
}

#[test]
fn test_integer_values_are_earliest_feasible() {
    let mut instance = ProblemInstance::new();
    let x = instance.new_int_var("x", 3, 50);
    let y = instance.new_int_var("y", 0, 50);
    let z = instance.new_int_var("z", -10, 50);
    instance.add("y_after_x", vec![Term::Int(1, y), Term::Int(-1, x)], Comparison::Ge, 4);
    instance.add("z_scaled", vec![Term::Int(-3, z)], Comparison::Le, -10);
    let result = BranchAndBound.solve(&instance, &budget()).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    let assignment = result.assignment.unwrap();
    assert_eq!(assignment.int(x), 3);
    assert_eq!(assignment.int(y), 7);
    // -3z <= -10  <=>  z >= 4
    assert_eq!(assignment.int(z), 4);
}

#[test]
fn test_non_difference_constraints_are_rejected() {
    let mut instance = ProblemInstance::new();
    let x = instance.new_int_var("x", 0, 10);
    let y = instance.new_int_var("y", 0, 10);
    instance.add("sum", vec![Term::Int(1, x), Term::Int(1, y)], Comparison::Le, 5);
    assert_eq!(
        BranchAndBound.solve(&instance, &budget()).unwrap_err(),
        ModelError::UnsupportedConstraint("sum".to_string())
    );

    let mut mixed = ProblemInstance::new();
    let x = mixed.new_int_var("x", 0, 10);
    let b = mixed.new_bool_var("b");
    mixed.add("mixed", vec![Term::Int(1, x), Term::Bool(2, b)], Comparison::Le, 5);
    assert!(matches!(
        BranchAndBound.solve(&mixed, &budget()),
        Err(ModelError::UnsupportedConstraint(_))
    ));
}

#[test]
fn test_foreign_variables_are_rejected() {
    let mut other = ProblemInstance::new();
    other.new_bool_var("a");
    let foreign = other.new_bool_var("b");
    let mut instance = ProblemInstance::new();
    instance.new_bool_var("only");
    instance.maximize(vec![(1, foreign)]);
    assert_eq!(instance.validate(), Err(ModelError::UnknownVariable));
    assert!(BranchAndBound.solve(&instance, &budget()).is_err());
}

#[test]
fn test_check_reports_violations() {
    let sat = demo_satellite();
    let model = ScheduleModelBuilder::build(&sat, &demo_requests()).unwrap();
    let mut assignment = BranchAndBound.solve(model.instance(), &budget()).unwrap().assignment.unwrap();
    let tokyo = model.vars()[0];
    assignment.set_int(tokyo.end, assignment.int(tokyo.start) + 1);
    assert!(model.instance().check(&assignment).is_err());
}

#[tokio::test]
async fn test_planner_reports_rejections_and_optimum() {
    let mut requests = demo_requests();
    requests.insert(1, ImagingRequest::new("Nowhere", (0.0, 0.0), 2, 0.0, (0, 10)));
    requests.push(requests[0].clone());
    let planner = Planner::new(Arc::new(BranchAndBound));
    let report = planner.plan(&demo_satellite(), requests, budget()).await.unwrap();
    assert_eq!(report.outcome.status(), SolveStatus::Optimal);
    let PlanOutcome::Optimal(schedule) = &report.outcome else { panic!("expected an optimal plan") };
    assert_eq!(schedule.total_priority(), 9);
    assert_eq!(
        report.rejected,
        vec![
            ("Nowhere".to_string(), RequestRejection::Invalid(ValidationError::NonPositiveArea)),
            ("Tokyo".to_string(), RequestRejection::Invalid(ValidationError::DuplicateRequestId)),
        ]
    );
}

#[tokio::test]
async fn test_planner_distinguishes_unknown() {
    let planner = Planner::new(Arc::new(BranchAndBound));
    let report = planner
        .plan(&demo_satellite(), demo_requests(), SearchBudget::new(Duration::ZERO))
        .await
        .unwrap();
    assert_eq!(report.outcome, PlanOutcome::Unknown);
    assert!(report.outcome.schedule().is_none());
}

#[tokio::test]
async fn test_planner_rejects_invalid_satellite() {
    let planner = Planner::new(Arc::new(BranchAndBound));
    let broken = SatelliteSpec::new(0.0, 0.15, 3.5, 120.0, 30, 50.0);
    assert!(planner.plan(&broken, demo_requests(), budget()).await.is_err());
}

#[tokio::test]
async fn test_planner_with_visibility_filter() {
    let orbit: Arc<dyn PositionSource> = Arc::new(CircularOrbit::new(6878.0, 0.0, 0.0, 0.0, (0, 86_400)));
    let filter = VisibilityFilter::new(orbit, VisibilityConfig::default());
    let planner = Planner::new(Arc::new(BranchAndBound)).with_visibility_filter(filter);
    let requests = vec![
        ImagingRequest::new("EquatorA", (0.0, 0.0), 2, 10.0, (0, 1000)),
        ImagingRequest::new("Antipode", (0.0, 180.0), 5, 10.0, (0, 1000)),
        ImagingRequest::new("EquatorB", (0.0, 0.0), 1, 10.0, (0, 1000)),
    ];
    let sat = demo_satellite();
    let report = planner.plan(&sat, requests, budget()).await.unwrap();
    assert_eq!(
        report.rejected,
        vec![("Antipode".to_string(), RequestRejection::Filtered(FilterRejection::NotVisible))]
    );
    let schedule = report.outcome.schedule().unwrap();
    assert_eq!(schedule.total_priority(), 3);
    for d in schedule.decisions() {
        assert_eq!(d.time_window_sec, (0, 220));
        assert!(d.end_time <= 220);
    }
    schedule.verify(&sat).unwrap();
}
