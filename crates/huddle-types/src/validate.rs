//! Payload validation helpers.

use thiserror::Error;
use validator::Validate;

/// A payload failed validation.
///
/// Wraps the per-field detail produced by the `validator` derive so that
/// callers can surface it without depending on `validator` themselves.
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct ValidationError {
    /// Human-readable description of the violated constraints.
    pub detail: String,
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self {
            detail: errors.to_string(),
        }
    }
}

/// Validate a payload against its derived constraints.
pub fn validate<T: Validate>(payload: &T) -> Result<(), ValidationError> {
    payload.validate().map_err(ValidationError::from)
}
