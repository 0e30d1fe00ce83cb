#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod common;
mod config;
mod logger;
mod mission;
mod orbit;
mod scheduling;
#[cfg(test)]
mod test_fixtures;
mod visibility;

use crate::config::{JsonFileCatalog, PlannerConfig, RequestCatalog, load_json};
use crate::mission::SatelliteSpec;
use crate::orbit::CircularOrbit;
use crate::scheduling::{BranchAndBound, PlanOutcome, Planner, SearchBudget};
use crate::visibility::{VisibilityConfig, VisibilityFilter};
use std::sync::Arc;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let config = PlannerConfig::from_env().unwrap_or_else(|e| fatal!("Invalid configuration: {e}"));
    let satellite: SatelliteSpec = load_json(&config.satellite_file)
        .await
        .unwrap_or_else(|e| fatal!("Could not load satellite record: {e}"));
    let requests = JsonFileCatalog::new(&config.requests_file)
        .load()
        .await
        .unwrap_or_else(|e| fatal!("Could not load request catalog: {e}"));

    let mut planner = Planner::new(Arc::new(BranchAndBound));
    if let Some(orbit_file) = &config.orbit_file {
        let orbit: CircularOrbit =
            load_json(orbit_file).await.unwrap_or_else(|e| fatal!("Could not load orbit: {e}"));
        if let Err(e) = orbit.validate() {
            fatal!("Orbit in {} is unusable: {e}", orbit_file.display());
        }
        let vis_config = VisibilityConfig {
            min_elevation_deg: config.min_elevation_deg,
            step_s: config.visibility_step_s,
            ..VisibilityConfig::default()
        };
        planner = planner.with_visibility_filter(VisibilityFilter::new(Arc::new(orbit), vis_config));
    }

    let report = match planner.plan(&satellite, requests, SearchBudget::new(config.time_budget)).await {
        Ok(report) => report,
        Err(e) => fatal!("Planning failed: {e}"),
    };
    for (id, reason) in &report.rejected {
        warn!("Request {id} was not considered: {reason}");
    }
    match &report.outcome {
        PlanOutcome::Optimal(schedule) => info!("Optimal schedule:\n{schedule}"),
        PlanOutcome::Feasible(schedule) => {
            warn!("Budget exhausted, schedule may not be optimal:\n{schedule}");
        }
        PlanOutcome::Infeasible => error!("No schedule satisfies the constraints."),
        PlanOutcome::Unknown => {
            error!(
                "No schedule found within {:?}. Retry with a larger SCHED_TIME_BUDGET_MS.",
                config.time_budget
            );
        }
    }
    log!(
        "Search explored {} nodes with {} incumbents in {:?}.",
        report.stats.nodes,
        report.stats.incumbents,
        report.stats.elapsed
    );
}
