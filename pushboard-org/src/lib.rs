//! # Pushboard Domain Models
//!
//! This crate provides the domain entities of the Pushboard push-notification
//! backend.
//!
//! ## Overview
//!
//! The pushboard-org crate handles:
//! - **Principals**: Accounts, with at most one parent (owner → child accounts)
//! - **Applications**: Push-enabled apps, their generated keys and credentials
//! - **Segments**: Audience slices of an application
//! - **Teams**: Groups of child accounts owned by an account
//! - **Access Grants**: Delegated access to an application's resource category
//!
//! ## Architecture
//!
//! ```text
//! Principal (owner)
//!   ├─ Principal (child account, parent = owner)
//!   ├─ Team ─→ members: [child account]
//!   └─ Application (user = owner)
//!         ├─ Image
//!         ├─ Segment (application = app)
//!         └─ AccessGrant (application, "segments", grantee)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pushboard_org::{AccessGrant, Application, NewApplication, Principal, SEGMENTS_CATEGORY};
//! use pushboard_org::keys::API_KEY_LENGTH;
//! use pushboard_rbac::Role;
//!
//! let owner = Principal::new("owner@example.com", Role::User);
//! let app = Application::create(NewApplication::new("Shop", "com.example.shop"), &owner, API_KEY_LENGTH).unwrap();
//!
//! // Let a child account manage the app's segments
//! let child = Principal::child_of(&owner, "ops@example.com");
//! let grant = AccessGrant::new(app.id, SEGMENTS_CATEGORY, child.id).with_granter(owner.id);
//! ```

pub mod application;
pub mod error;
pub mod grant;
pub mod image;
pub mod keys;
pub mod principal;
pub mod segment;
pub mod team;

// Re-export main types for convenience
pub use application::{Application, ApplicationUpdate, CredentialSlot, NewApplication};
pub use error::{OrgError, OrgResult};
pub use grant::AccessGrant;
pub use image::Image;
pub use principal::Principal;
pub use segment::{Segment, SegmentUpdate, SEGMENTS_CATEGORY};
pub use team::Team;
