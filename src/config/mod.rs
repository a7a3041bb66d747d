//! Configuration types, loading, and storage.
//!
//! Static settings (ingest bind address, logging) are read once at
//! startup; the relay rules and channel credentials are re-read through
//! a [`store::ConfigStore`] for every inbound event so settings edits
//! apply immediately.

mod loader;
pub mod store;
mod types;

pub use store::{ConfigError, ConfigStore, FileConfigStore, MemoryConfigStore, SharedConfigStore};
pub use types::{
    ChannelsConfig, Config, IngestConfig, RelayRules, ResendConfig, TelegramConfig,
    TelemetryConfig, WhatsAppConfig,
};
