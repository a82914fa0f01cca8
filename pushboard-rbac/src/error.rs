//! Error types for role table construction and evaluation.

use thiserror::Error;

use crate::roles::Role;

/// Role table errors.
///
/// Construction errors reject a malformed policy before it is ever consulted.
/// Evaluation errors mean the table could not reach a decision, which callers
/// must report as a system failure rather than as a denial.
#[derive(Debug, Error)]
pub enum RbacError {
    /// The request method is not one the table understands
    #[error("Unknown request method: {0:?}")]
    UnknownMethod(String),

    /// A resource pattern is empty or not rooted at `/`
    #[error("Invalid resource pattern: {0:?}")]
    InvalidPattern(String),

    /// A role lists the same resource pattern more than once
    #[error("Duplicate rule for role {role} on {pattern}")]
    DuplicateRule {
        /// Role carrying the duplicate.
        role: Role,
        /// Pattern listed twice.
        pattern: String,
    },

    /// A string permission value other than the `*` wildcard
    #[error("Invalid permission value: {0:?} (expected \"*\" or a list of methods)")]
    InvalidPermissions(String),

    /// The policy document could not be parsed
    #[error("Malformed role policy: {0}")]
    MalformedPolicy(String),
}

/// Result type for role table operations.
pub type RbacResult<T> = Result<T, RbacError>;

impl RbacError {
    /// Check if this error was raised while evaluating a request, as opposed
    /// to while building the table.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(self, RbacError::UnknownMethod(_))
    }
}

impl From<serde_json::Error> for RbacError {
    fn from(err: serde_json::Error) -> Self {
        RbacError::MalformedPolicy(err.to_string())
    }
}
