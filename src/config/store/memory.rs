//! In-memory configuration store.
//!
//! Useful for testing and programmatic configuration.

use async_trait::async_trait;
use std::sync::RwLock;

use super::{ConfigError, ConfigStore};
use crate::config::Config;

/// In-memory configuration store.
///
/// Each `load` clones the current snapshot; `update` swaps it for the
/// next event to pick up.
pub struct MemoryConfigStore {
    config: RwLock<Config>,
}

impl MemoryConfigStore {
    /// Create a new memory config store with initial configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Replace the stored configuration.
    pub fn update(&self, config: Config) {
        let mut guard = self.config.write().expect("config lock poisoned");
        *guard = config;
    }

    /// Get the current configuration.
    pub fn current(&self) -> Config {
        self.config.read().expect("config lock poisoned").clone()
    }

    /// Create a memory store from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config = Config::from_yaml(yaml).map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        Ok(Self::new(config))
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self) -> Result<Config, ConfigError> {
        Ok(self.current())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
