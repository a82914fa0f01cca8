//! Error types for service operations

use pushboard_access::{AccessError, ErrorBody, StoreError};
use pushboard_org::OrgError;
use thiserror::Error;

/// Message returned for store failures.
pub const STORE_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Service error types.
///
/// Each variant maps to one HTTP status. Authorization failures keep the
/// [`AccessError`] so the caller still gets the gate's status and message.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request body failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// A route parameter is not a well-formed identifier
    #[error("{0}")]
    InvalidIdentifier(String),

    /// The referenced document does not exist
    #[error("{0}")]
    NotFound(String),

    /// The caller may not act on this document
    #[error("{0}")]
    Forbidden(String),

    /// An upload could not be processed
    #[error("{0}")]
    Upload(String),

    /// The authorization gate rejected the request
    #[error(transparent)]
    Access(#[from] AccessError),

    /// A document or blob store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<OrgError> for ServiceError {
    fn from(err: OrgError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl ServiceError {
    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidInput(_)
            | ServiceError::InvalidIdentifier(_)
            | ServiceError::Upload(_) => 400,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Access(err) => err.status_code(),
            ServiceError::Store(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput(_) => "INVALID_INPUT",
            ServiceError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::Upload(_) => "UPLOAD_FAILED",
            ServiceError::Access(err) => err.error_code(),
            ServiceError::Store(_) => "STORE_ERROR",
        }
    }

    /// Response body for this error. Store and authorization causes are not
    /// exposed.
    pub fn body(&self) -> ErrorBody {
        match self {
            ServiceError::Access(err) => err.body(),
            ServiceError::Store(_) => ErrorBody {
                message: STORE_ERROR_MESSAGE.to_string(),
            },
            other => ErrorBody {
                message: other.to_string(),
            },
        }
    }
}
