//! Process wiring and lifecycle.
//!
//! Builds the store, dispatcher, and engine from configuration, serves
//! the ingest listener, and on shutdown drains in-flight sends (bounded
//! by the configured drain period) before the process exits.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::dispatch::{Dispatcher, HttpSmsGateway, SmsTransport};
use crate::ingest::{self, IngestState};
use crate::relay::RelayEngine;

/// The assembled daemon.
pub struct Server {
    config: Config,
    state: Arc<IngestState>,
}

impl Server {
    /// Wire up the daemon from startup configuration.
    ///
    /// Relay rules and channel credentials are re-read from
    /// `config_path` per event; the listener address, HTTP timeout, and
    /// gateway endpoint are fixed at startup.
    pub fn new(config: Config, config_path: PathBuf) -> Result<Self> {
        let store = Arc::new(FileConfigStore::new(config_path));

        let client = reqwest::Client::builder()
            .timeout(config.channels.http_timeout)
            .build()
            .context("failed to build HTTP client")?;

        let gateway_url = config.channels.resend.gateway_url.trim();
        let transport: Option<Arc<dyn SmsTransport>> = if gateway_url.is_empty() {
            None
        } else {
            Some(Arc::new(HttpSmsGateway::new(
                client.clone(),
                gateway_url.to_string(),
            )))
        };

        if let Some(ref transport) = transport {
            info!(transport = transport.name(), "resend transport configured");
        }
        info!(config_store = store.name(), "per-event config store ready");

        let dispatcher = Dispatcher::new(client, transport);
        let engine = RelayEngine::new(store, dispatcher);

        Ok(Self {
            config,
            state: Arc::new(IngestState { engine }),
        })
    }

    /// Serve until interrupted, then drain outstanding sends.
    pub async fn run(self) -> Result<()> {
        let address = self.config.ingest.address;
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("failed to bind ingest listener on {address}"))?;

        info!(address = %address, "ingest listening");

        let inflight = self.state.engine.dispatcher().in_flight().clone();
        let app = ingest::router(self.state.clone());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("ingest server failed")?;

        // Spawned sends must finish before the process may exit.
        let drain_period = self.config.ingest.drain_period;
        info!(
            in_flight = inflight.count(),
            drain_period_secs = drain_period.as_secs(),
            "draining in-flight sends"
        );

        if tokio::time::timeout(drain_period, inflight.drained())
            .await
            .is_err()
        {
            warn!(
                abandoned = inflight.count(),
                "drain period expired with sends still in flight"
            );
        } else {
            info!("all sends drained");
        }

        Ok(())
    }
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => warn!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}
