use super::{ConfigError, JsonFileCatalog, PlannerConfig, RequestCatalog, load_json};
use crate::mission::SatelliteSpec;
use crate::orbit::CircularOrbit;
use crate::test_fixtures::{demo_requests, demo_satellite};
use std::{collections::HashMap, path::PathBuf, time::Duration};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> =
        vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

fn fixture(name: &str) -> PathBuf { PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name) }

#[test]
fn test_defaults_without_environment() {
    let config = PlannerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.time_budget, Duration::from_secs(10));
    assert!((config.min_elevation_deg - 10.0).abs() < f64::EPSILON);
    assert_eq!(config.visibility_step_s, 10);
    assert_eq!(config.satellite_file, PathBuf::from("fixtures/satellite.json"));
    assert!(config.orbit_file.is_none());
}

#[test]
fn test_environment_overrides() {
    let config = PlannerConfig::from_lookup(lookup(&[
        ("SCHED_TIME_BUDGET_MS", "250"),
        ("SCHED_MIN_ELEVATION_DEG", " 25.5 "),
        ("SCHED_VISIBILITY_STEP_S", "5"),
        ("SCHED_REQUESTS_FILE", "/tmp/requests.json"),
        ("SCHED_ORBIT_FILE", "orbit.json"),
    ]))
    .unwrap();
    assert_eq!(config.time_budget, Duration::from_millis(250));
    assert!((config.min_elevation_deg - 25.5).abs() < f64::EPSILON);
    assert_eq!(config.visibility_step_s, 5);
    assert_eq!(config.requests_file, PathBuf::from("/tmp/requests.json"));
    assert_eq!(config.orbit_file, Some(PathBuf::from("orbit.json")));
}

#[test]
fn test_invalid_values_name_the_variable() {
    let res = PlannerConfig::from_lookup(lookup(&[("SCHED_TIME_BUDGET_MS", "soon")]));
    assert_eq!(res, Err(ConfigError::InvalidVar("SCHED_TIME_BUDGET_MS")));
    let res = PlannerConfig::from_lookup(lookup(&[("SCHED_VISIBILITY_STEP_S", "0")]));
    assert_eq!(res, Err(ConfigError::InvalidVar("SCHED_VISIBILITY_STEP_S")));
    let res = PlannerConfig::from_lookup(lookup(&[("SCHED_MIN_ELEVATION_DEG", "120")]));
    assert_eq!(res, Err(ConfigError::InvalidVar("SCHED_MIN_ELEVATION_DEG")));
}

#[tokio::test]
async fn test_fixture_files_load() {
    let catalog = JsonFileCatalog::new(fixture("requests.json"));
    assert_eq!(catalog.load().await.unwrap(), demo_requests());
    let satellite: SatelliteSpec = load_json(&fixture("satellite.json")).await.unwrap();
    assert_eq!(satellite, demo_satellite());
    let orbit: CircularOrbit = load_json(&fixture("orbit.json")).await.unwrap();
    assert!((orbit.radius_km() - 6878.0).abs() < 1e-9);
    assert!(orbit.validate().is_ok());
}

#[test]
fn test_deserialized_orbit_with_bad_elements_fails_validation() {
    let json = r#"{"radius_km": -1.0, "inclination_deg": 0.0, "raan_deg": 0.0, "phase_deg": 0.0, "valid_range": [100, 0]}"#;
    let orbit: CircularOrbit = serde_json::from_str(json).unwrap();
    assert!(orbit.validate().is_err());
}

#[tokio::test]
async fn test_missing_and_malformed_files() {
    let missing = JsonFileCatalog::new(fixture("does_not_exist.json"));
    assert!(matches!(missing.load().await, Err(ConfigError::Io(_))));
    let wrong_shape = JsonFileCatalog::new(fixture("satellite.json"));
    assert!(matches!(wrong_shape.load().await, Err(ConfigError::Parse(_))));
}
