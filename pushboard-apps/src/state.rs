//! Service wiring
//!
//! Builds the stores, the role table, the authorization gate and the services
//! from one [`AppsConfig`].

use pushboard_access::{AuthorizationGate, MemoryDelegationStore, ResourceAccessResolver};
use pushboard_org::{Application, Team};
use std::sync::Arc;
use tracing::info;

use crate::applications::ApplicationService;
use crate::blob::MemoryBlobStore;
use crate::config::{AppsConfig, ConfigError};
use crate::error::ServiceResult;
use crate::loader;
use crate::segments::SegmentService;
use crate::sharing::SharingService;
use crate::store::MemoryDocumentStore;
use crate::teams::TeamService;

/// Everything a request handler needs, backed by in-memory stores.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application, segment, team and account documents
    pub documents: Arc<MemoryDocumentStore>,
    /// Uploaded images
    pub blobs: Arc<MemoryBlobStore>,
    /// Delegated access grants
    pub grants: Arc<MemoryDelegationStore>,
    /// Application operations
    pub applications: ApplicationService,
    /// Team operations
    pub teams: TeamService,
    /// Gate-guarded segment operations
    pub segments: SegmentService,
    /// Grant administration
    pub sharing: SharingService,
}

impl AppState {
    /// Validate `config`, load the role table and wire the services.
    pub fn from_config(config: AppsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = config.load_role_table()?;
        info!(
            rules = table.len(),
            policy = config.role_policy_path.as_deref().unwrap_or("built-in"),
            "Role table loaded"
        );

        let documents = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new(config.image_base_url.clone()));
        let grants = Arc::new(MemoryDelegationStore::new());

        let gate = AuthorizationGate::new(
            Arc::new(table),
            Arc::new(ResourceAccessResolver::new(grants.clone())),
        );

        Ok(Self {
            applications: ApplicationService::new(documents.clone(), blobs.clone(), config),
            teams: TeamService::new(documents.clone(), documents.clone()),
            segments: SegmentService::new(documents.clone(), gate),
            sharing: SharingService::new(grants.clone(), documents.clone()),
            documents,
            blobs,
            grants,
        })
    }

    /// Resolve an `:applicationId` route parameter.
    pub async fn application(&self, raw_id: &str) -> ServiceResult<Application> {
        loader::application_by_id(self.documents.as_ref(), raw_id).await
    }

    /// Resolve a `:teamId` route parameter.
    pub async fn team(&self, raw_id: &str) -> ServiceResult<Team> {
        loader::team_by_id(self.documents.as_ref(), raw_id).await
    }
}
