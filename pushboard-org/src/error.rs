//! Error types for domain model validation.

use thiserror::Error;

/// Domain validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrgError {
    /// A field failed validation
    #[error("{message}")]
    Validation {
        /// Field that failed validation.
        field: &'static str,
        /// Human-readable message suitable for API responses.
        message: String,
    },

    /// Credential slot name is not recognised
    #[error("Unknown credential slot: {0}")]
    UnknownCredential(String),
}

/// Result type for domain model operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl OrgError {
    /// Build a validation error for `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        OrgError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Trim `value` and reject it if nothing is left.
pub(crate) fn required(field: &'static str, value: &str, message: &str) -> OrgResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OrgError::validation(field, message));
    }
    Ok(trimmed.to_string())
}
