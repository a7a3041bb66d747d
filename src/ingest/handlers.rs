//! Ingest API handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::relay::{Disposition, InboundMessage};

use super::IngestState;

/// One inbound short-message event.
///
/// Either the full `body` or the ordered physical `segments` of one
/// logical message; segments are concatenated on receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub from: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub segments: Option<Vec<String>>,
}

impl SubmitRequest {
    fn into_message(self) -> Result<InboundMessage, &'static str> {
        match (self.body, self.segments) {
            (Some(body), _) => Ok(InboundMessage::new(self.from, body)),
            (None, Some(segments)) => Ok(InboundMessage::from_segments(self.from, &segments)),
            (None, None) => Err("either body or segments is required"),
        }
    }
}

/// Disposition response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub disposition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Submit handler.
pub async fn submit_handler(
    State(state): State<Arc<IngestState>>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    let message = match request.into_message() {
        Ok(message) => message,
        Err(reason) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: reason.to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.engine.handle(message).await {
        Ok(Disposition::Dispatched { attempts }) => (
            StatusCode::ACCEPTED,
            Json(SubmitResponse {
                disposition: "dispatched".to_string(),
                reason: None,
                attempts: Some(attempts),
            }),
        )
            .into_response(),
        Ok(Disposition::Dropped(reason)) => (
            StatusCode::OK,
            Json(SubmitResponse {
                disposition: "dropped".to_string(),
                reason: Some(reason.as_str().to_string()),
                attempts: None,
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "configuration unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "configuration unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check handler.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
