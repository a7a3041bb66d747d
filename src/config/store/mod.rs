//! Configuration storage backends.
//!
//! The relay core reads one configuration snapshot per inbound event
//! through the [`ConfigStore`] trait, so a settings edit between two
//! events is picked up by the next event without any coordination. The
//! core never writes back through this seam.
//!
//! # Built-in Implementations
//!
//! - [`FileConfigStore`] - re-reads and re-parses a YAML file per load
//! - [`MemoryConfigStore`] - in-memory snapshot with programmatic updates

mod file;
mod memory;

pub use file::FileConfigStore;
pub use memory::MemoryConfigStore;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::Config;

/// Configuration storage error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to load configuration.
    #[error("failed to load config: {0}")]
    LoadFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Read-only configuration provider.
///
/// Each `load` returns an independent copy-on-read snapshot; callers
/// hold it immutably for the duration of one event.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load a configuration snapshot from storage.
    async fn load(&self) -> Result<Config, ConfigError>;

    /// Get the backend name for logging.
    fn name(&self) -> &'static str;
}

/// A boxed configuration store.
pub type SharedConfigStore = Arc<dyn ConfigStore>;
