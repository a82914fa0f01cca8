//! # Pushboard Apps
//!
//! This crate provides the service layer of the Pushboard push-notification
//! backend: applications, segments and teams, with file uploads and the
//! authorization gate in front of segment routes.
//!
//! ## Overview
//!
//! The pushboard-apps crate handles:
//! - **Applications**: Registration, generated API keys, partial updates,
//!   credential and icon uploads
//! - **Segments**: CRUD behind the two-stage authorization gate
//! - **Teams**: Groups of child accounts, owner-only
//! - **Sharing**: Delegated access grants issued by application owners
//! - **Loaders**: Route parameter resolution with 400/404 outcomes
//! - **Configuration**: Environment-driven limits and the role policy file
//!
//! ## Request Flow
//!
//! ```text
//! :applicationId ──→ loader ──→ Application
//!                                   │
//! principal, route, method ──→ AuthorizationGate ──→ Allow ──→ SegmentService
//!                                   │
//!                                   └──→ Deny (403) / Error (500)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pushboard_apps::{AppState, AppsConfig, NewSegment};
//! use pushboard_org::{NewApplication, Principal};
//! use pushboard_rbac::Role;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::from_config(AppsConfig::from_env())?;
//!     let owner = Principal::new("owner@example.com", Role::User);
//!
//!     let app = state
//!         .applications
//!         .create(&owner, NewApplication::new("Shop", "com.example.shop"))
//!         .await?;
//!
//!     let app = state.application(&app.id.to_string()).await?;
//!     let segment = state
//!         .segments
//!         .create(Some(&owner), &app, NewSegment { name: "VIP".into(), filters: vec![] })
//!         .await?;
//!     println!("Created segment {}", segment.id);
//!     Ok(())
//! }
//! ```

pub mod applications;
pub mod blob;
pub mod config;
pub mod error;
pub mod loader;
pub mod segments;
pub mod sharing;
pub mod state;
pub mod store;
pub mod teams;

// Re-export main types
pub use applications::{ApplicationService, CredentialUpload};
pub use blob::{BlobStore, MemoryBlobStore, Upload};
pub use config::{AppsConfig, ConfigError};
pub use error::{ServiceError, ServiceResult, STORE_ERROR_MESSAGE};
pub use segments::{NewSegment, SegmentService};
pub use sharing::SharingService;
pub use state::AppState;
pub use store::{
    ApplicationStore, MemoryDocumentStore, PrincipalDirectory, SegmentStore, TeamStore,
};
pub use teams::TeamService;
