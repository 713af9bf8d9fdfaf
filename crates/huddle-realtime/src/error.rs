//! Error types for the realtime module.

use thiserror::Error;

/// Errors that can occur in realtime operations.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// Maximum number of concurrent connections reached.
    #[error("maximum connections reached: {0}")]
    ConnectionLimit(usize),

    /// The client's outbound channel is closed.
    #[error("channel closed")]
    ChannelClosed,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
