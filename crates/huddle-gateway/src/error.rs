//! Gateway error type and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by gateway routes.
///
/// Health probes never produce these at the route level; their failures
/// are absorbed into per-service booleans.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A downstream service failed or answered with garbage.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A downstream call exceeded its time cap.
    #[error("upstream timeout after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Upstream(e.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                message: "bad gateway".to_string(),
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    error: String,
}
