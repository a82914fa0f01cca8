//! # Pushboard RBAC (Role-Based Access Control)
//!
//! This crate provides the route-level half of Pushboard authorization:
//! which roles may use which methods on which route templates.
//!
//! ## Overview
//!
//! The pushboard-rbac crate handles:
//! - **Roles**: The closed set of permission tiers (guest, user, admin)
//! - **Methods**: HTTP-style verbs a rule can grant
//! - **Method Sets**: `*` (every method) or an explicit list (empty denies)
//! - **Role Table**: Validated role → route template → method set lookup
//!
//! ## Architecture
//!
//! ```text
//! RoleTable
//!   └─ Role
//!        └─ route template ─→ MethodSet ("*" | [methods])
//!
//! Example:
//!   user  /api/applications/:applicationId/segments  "*"
//!   guest /api/applications/:applicationId/segments  []
//! ```
//!
//! Route templates are compared verbatim. Path parameters such as
//! `:applicationId` are never matched against concrete values; whether the
//! referenced application exists, and whether the caller may touch it, is
//! decided elsewhere.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pushboard_rbac::{PermissionMatcher, Role, RoleTable, SEGMENTS_ROUTE};
//!
//! let table = RoleTable::segments_default();
//!
//! assert!(table.is_role_allowed(Role::User, SEGMENTS_ROUTE, "GET").unwrap());
//! assert!(!table.is_role_allowed(Role::Guest, SEGMENTS_ROUTE, "GET").unwrap());
//!
//! // Unknown methods cannot be evaluated
//! assert!(table.is_role_allowed(Role::User, SEGMENTS_ROUTE, "BREW").is_err());
//! ```
//!
//! ## Deny by Default
//!
//! - A role with no rules is denied everything
//! - A route template a role does not list is denied
//! - An empty method set denies every method

pub mod error;
pub mod methods;
pub mod permissions;
pub mod roles;
pub mod table;

// Re-export main types for convenience
pub use error::{RbacError, RbacResult};
pub use methods::Method;
pub use permissions::{MethodSet, RolePolicy, RoleRule};
pub use roles::Role;
pub use table::{PermissionMatcher, RoleTable, SEGMENTS_ROUTE, SEGMENT_ROUTE};
