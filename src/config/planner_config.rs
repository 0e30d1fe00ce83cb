use std::{env, path::PathBuf, str::FromStr, time::Duration};
use strum_macros::Display;

/// Errors raised while loading configuration or injected data files.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is set but cannot be parsed, by variable name.
    InvalidVar(&'static str),
    Io(String),
    Parse(String),
}

impl std::error::Error for ConfigError {}

/// Runtime settings of the planner binary, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub satellite_file: PathBuf,
    pub requests_file: PathBuf,
    /// Circular orbit used for the visibility pre-filter. Filtering is skipped when unset.
    pub orbit_file: Option<PathBuf>,
    pub time_budget: Duration,
    pub min_elevation_deg: f64,
    pub visibility_step_s: i64,
}

impl PlannerConfig {
    const SATELLITE_VAR: &'static str = "SCHED_SATELLITE_FILE";
    const REQUESTS_VAR: &'static str = "SCHED_REQUESTS_FILE";
    const ORBIT_VAR: &'static str = "SCHED_ORBIT_FILE";
    const BUDGET_VAR: &'static str = "SCHED_TIME_BUDGET_MS";
    const ELEVATION_VAR: &'static str = "SCHED_MIN_ELEVATION_DEG";
    const STEP_VAR: &'static str = "SCHED_VISIBILITY_STEP_S";

    const DEFAULT_SATELLITE_FILE: &'static str = "fixtures/satellite.json";
    const DEFAULT_REQUESTS_FILE: &'static str = "fixtures/requests.json";
    const DEFAULT_BUDGET_MS: u64 = 10_000;
    const DEFAULT_MIN_ELEVATION_DEG: f64 = 10.0;
    const DEFAULT_STEP_S: i64 = 10;

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidVar`] if a numeric variable does not parse or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|key| env::var(key).ok()) }

    /// Reads the configuration through `lookup`, which maps variable names to values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where F: Fn(&str) -> Option<String> {
        let path_or = |key: &str, default: &str| lookup(key).map_or_else(|| PathBuf::from(default), PathBuf::from);
        let budget_ms = Self::parse_or(&lookup, Self::BUDGET_VAR, Self::DEFAULT_BUDGET_MS)?;
        let min_elevation_deg =
            Self::parse_or(&lookup, Self::ELEVATION_VAR, Self::DEFAULT_MIN_ELEVATION_DEG)?;
        let visibility_step_s = Self::parse_or(&lookup, Self::STEP_VAR, Self::DEFAULT_STEP_S)?;
        if !(-90.0..=90.0).contains(&min_elevation_deg) {
            return Err(ConfigError::InvalidVar(Self::ELEVATION_VAR));
        }
        if visibility_step_s <= 0 {
            return Err(ConfigError::InvalidVar(Self::STEP_VAR));
        }
        Ok(Self {
            satellite_file: path_or(Self::SATELLITE_VAR, Self::DEFAULT_SATELLITE_FILE),
            requests_file: path_or(Self::REQUESTS_VAR, Self::DEFAULT_REQUESTS_FILE),
            orbit_file: lookup(Self::ORBIT_VAR).map(PathBuf::from),
            time_budget: Duration::from_millis(budget_ms),
            min_elevation_deg,
            visibility_step_s,
        })
    }

    fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
        T: FromStr,
    {
        match lookup(key) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar(key)),
            None => Ok(default),
        }
    }
}
