//! File-backed configuration store.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{ConfigError, ConfigStore};
use crate::config::Config;

/// Configuration store backed by a YAML file.
///
/// The file is read and parsed on every `load`, so edits saved between
/// two inbound events apply to the next event with no reload signal.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this store reads from.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> Result<Config, ConfigError> {
        let path = self.path.clone();
        // Blocking file I/O kept off the runtime workers.
        let config = tokio::task::spawn_blocking(move || Config::load(&path))
            .await
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?
            .map_err(ConfigError::Backend)?;
        Ok(config)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
