mod catalog;
mod planner_config;
#[cfg(test)]
mod tests;

pub use catalog::{JsonFileCatalog, RequestCatalog, load_json};
pub use planner_config::{ConfigError, PlannerConfig};
