//! Store error types.

use huddle_types::ValidationError;
use thiserror::Error;

/// Errors that can occur during chat log operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The payload violated a length or presence constraint.
    #[error("invalid payload: {0}")]
    Validation(#[from] ValidationError),

    /// The backend failed to read or write.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored record could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<rocksdb::Error> for StoreError {
    fn from(e: rocksdb::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// A specialized Result type for chat log operations.
pub type Result<T> = std::result::Result<T, StoreError>;
