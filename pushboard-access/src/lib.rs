//! # Pushboard Access Control
//!
//! This crate decides whether a request may touch an application's
//! sub-resources.
//!
//! ## Overview
//!
//! The pushboard-access crate handles:
//! - **Delegation Store**: Persisted grants giving non-owners access to an
//!   application's resource category
//! - **Resource Access Resolver**: Ownership first, then delegation
//! - **Authorization Gate**: Role table check, then resource check
//! - **Errors**: Four internal failure causes behind two external responses
//!
//! ## Flow
//!
//! ```text
//! request (principal?, route template, method, application, category)
//!   │
//!   ├─ PermissionMatcher (role table)
//!   │     ├─ Err   → 500 "Unexpected authorization error"
//!   │     └─ false → 403 (RoleDenied)
//!   │
//!   └─ AccessResolver
//!         ├─ owner               → allow, no store query
//!         ├─ entitled grant      → allow
//!         ├─ no grant            → 403 (ResourceDenied)
//!         └─ store failure       → 403 (ResourceLookup)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pushboard_access::{AuthorizationGate, MemoryDelegationStore, ResourceAccessResolver};
//! use pushboard_rbac::RoleTable;
//!
//! let store = Arc::new(MemoryDelegationStore::new());
//! let gate = AuthorizationGate::new(
//!     Arc::new(RoleTable::segments_default()),
//!     Arc::new(ResourceAccessResolver::new(store)),
//! );
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate integrates with:
//! - `pushboard-rbac`: The role table behind the first stage
//! - `pushboard-org`: Principals, applications and grants
//! - `pushboard-apps`: Services that call the gate before touching segments

pub mod error;
pub mod gate;
pub mod resolver;
pub mod store;

// Re-export main types
pub use error::{AccessError, AccessResult, ErrorBody, DENIED_MESSAGE, SYSTEM_ERROR_MESSAGE};
pub use gate::{AuthorizationGate, Decision};
pub use resolver::{AccessResolver, ResourceAccessResolver};
pub use store::{
    DelegationStore, DelegationStoreStats, MemoryDelegationStore, StoreError, StoreResult,
};
