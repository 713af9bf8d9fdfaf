//! Error types for the pub/sub bridge.

use thiserror::Error;

/// Errors that can occur in pub/sub operations.
#[derive(Debug, Error)]
pub enum PubSubError {
    /// Broker connection could not be established.
    #[error("broker connection failed: {0}")]
    Connection(String),

    /// Publish command failed.
    #[error("publish failed: {0}")]
    Publish(String),

    /// Subscribe command failed.
    #[error("subscribe failed: {0}")]
    Subscribe(String),

    /// Payload could not be serialized.
    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
