//! Inbound HTTP surface.
//!
//! Stands in for the platform event source: the upstream integration
//! posts one request per logical inbound message (segments already
//! ordered) and receives the disposition in the response. Health probes
//! ride the same listener.

mod handlers;

pub use handlers::{ErrorResponse, HealthResponse, SubmitRequest, SubmitResponse};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::relay::RelayEngine;

use handlers::{health_handler, submit_handler};

/// Shared state behind the ingest routes.
pub struct IngestState {
    pub engine: RelayEngine,
}

/// Build the ingest router.
pub fn router(state: Arc<IngestState>) -> Router {
    Router::new()
        .route("/v1/messages", post(submit_handler))
        .route("/healthz", get(health_handler))
        .with_state(state)
}
