use super::planner_config::ConfigError;
use crate::log;
use crate::mission::ImagingRequest;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Source of imaging requests.
#[async_trait]
pub trait RequestCatalog: Send + Sync {
    async fn load(&self) -> Result<Vec<ImagingRequest>, ConfigError>;
}

/// A request catalog stored as a JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

#[async_trait]
impl RequestCatalog for JsonFileCatalog {
    async fn load(&self) -> Result<Vec<ImagingRequest>, ConfigError> {
        let requests: Vec<ImagingRequest> = load_json(&self.path).await?;
        log!("Loaded {} requests from {}.", requests.len(), self.path.display());
        Ok(requests)
    }
}

/// Reads and deserializes a JSON document.
///
/// # Errors
/// - [`ConfigError::Io`] if the file cannot be read.
/// - [`ConfigError::Parse`] if its content does not match `T`.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))
}
