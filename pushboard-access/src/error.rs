//! Error types for authorization decisions
//!
//! This module defines the four ways an authorization check can fail to
//! allow a request, and how each one is presented to HTTP clients.

use pushboard_rbac::{RbacError, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Message returned for every denial, whichever stage denied.
pub const DENIED_MESSAGE: &str = "User is not authorized to access this resource";

/// Message returned when the role table could not be evaluated.
pub const SYSTEM_ERROR_MESSAGE: &str = "Unexpected authorization error";

/// Authorization failure causes.
///
/// Callers see only two shapes: a 403 with [`DENIED_MESSAGE`] or a 500 with
/// [`SYSTEM_ERROR_MESSAGE`]. The variants keep the real cause for logs.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The role table could not evaluate the request
    #[error("Role evaluation failed: {0}")]
    RoleEvaluation(#[source] RbacError),

    /// The role may not use this method on this route
    #[error("Role {role} may not {method} {route}")]
    RoleDenied {
        /// Effective role of the caller.
        role: Role,
        /// Route template that was checked.
        route: String,
        /// Request method that was checked.
        method: String,
    },

    /// The delegation store failed to answer
    #[error("Resource lookup failed: {0}")]
    ResourceLookup(#[source] StoreError),

    /// The caller neither owns the application nor holds a grant
    #[error("No {category} access on application {application_id}")]
    ResourceDenied {
        /// Application that was checked.
        application_id: Uuid,
        /// Resource category that was checked.
        category: String,
    },
}

/// Result type for authorization operations.
pub type AccessResult<T> = Result<T, AccessError>;

/// JSON body sent with authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Client-facing message
    pub message: String,
}

impl AccessError {
    /// Check if this error means the authorization system itself failed.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AccessError::RoleEvaluation(_))
    }

    /// Check if this error was raised by the resource stage.
    pub fn is_resource_stage(&self) -> bool {
        matches!(
            self,
            AccessError::ResourceLookup(_) | AccessError::ResourceDenied { .. }
        )
    }

    /// Get HTTP status code for this error.
    ///
    /// Lookup failures fail closed as denials.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::RoleEvaluation(_) => 500,
            AccessError::RoleDenied { .. }
            | AccessError::ResourceLookup(_)
            | AccessError::ResourceDenied { .. } => 403,
        }
    }

    /// Get error code for logs and audit records.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::RoleEvaluation(_) => "ROLE_EVALUATION_ERROR",
            AccessError::RoleDenied { .. } => "ROLE_DENIED",
            AccessError::ResourceLookup(_) => "RESOURCE_LOOKUP_ERROR",
            AccessError::ResourceDenied { .. } => "RESOURCE_DENIED",
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> &'static str {
        if self.is_server_error() {
            SYSTEM_ERROR_MESSAGE
        } else {
            DENIED_MESSAGE
        }
    }

    /// Response body for this error.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            message: self.public_message().to_string(),
        }
    }
}
