//! Service error type and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use huddle_pubsub::PubSubError;
use huddle_store::StoreError;
use huddle_types::ValidationError;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the notifications service API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload violated its constraints.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The chat log rejected or failed the operation.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The pub/sub bridge could not accept the event.
    #[error("{0}")]
    PubSub(#[from] PubSubError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(_) | ApiError::Store(StoreError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "invalid payload")
            }
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage failure"),
            ApiError::PubSub(_) => (StatusCode::INTERNAL_SERVER_ERROR, "delivery failure"),
        };

        (
            status,
            Json(ErrorResponse {
                message: message.to_string(),
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
