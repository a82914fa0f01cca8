//! Document store
//!
//! Collection traits the services persist through, and an in-memory store
//! implementing all of them for single-process deployments and tests.

use async_trait::async_trait;
use pushboard_access::StoreResult;
use pushboard_org::{Application, Principal, Segment, Team};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Application documents.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Insert or replace an application.
    async fn save_application(&self, application: Application) -> StoreResult<()>;

    /// Get an application by ID.
    async fn get_application(&self, id: Uuid) -> StoreResult<Option<Application>>;

    /// Delete an application, returning it if it existed.
    async fn delete_application(&self, id: Uuid) -> StoreResult<Option<Application>>;

    /// Applications owned by `owner`, newest first.
    async fn applications_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Application>>;
}

/// Segment documents.
#[async_trait]
pub trait SegmentStore: Send + Sync {
    /// Insert or replace a segment.
    async fn save_segment(&self, segment: Segment) -> StoreResult<()>;

    /// Get a segment by ID.
    async fn get_segment(&self, id: Uuid) -> StoreResult<Option<Segment>>;

    /// Delete a segment, returning it if it existed.
    async fn delete_segment(&self, id: Uuid) -> StoreResult<Option<Segment>>;

    /// Segments of an application, oldest first.
    async fn segments_by_application(&self, application_id: Uuid) -> StoreResult<Vec<Segment>>;
}

/// Team documents.
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Insert or replace a team.
    async fn save_team(&self, team: Team) -> StoreResult<()>;

    /// Get a team by ID.
    async fn get_team(&self, id: Uuid) -> StoreResult<Option<Team>>;

    /// Delete a team, returning it if it existed.
    async fn delete_team(&self, id: Uuid) -> StoreResult<Option<Team>>;

    /// Teams owned by `owner`, sorted by name.
    async fn teams_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Team>>;
}

/// Account documents.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Insert or replace an account.
    async fn save_principal(&self, principal: Principal) -> StoreResult<()>;

    /// Get an account by ID.
    async fn get_principal(&self, id: Uuid) -> StoreResult<Option<Principal>>;

    /// Those of `ids` that are child accounts of `parent`.
    async fn children_of(&self, parent: Uuid, ids: &[Uuid]) -> StoreResult<Vec<Principal>>;
}

/// In-memory document store.
///
/// This is suitable for single-process applications and testing.
#[derive(Default)]
pub struct MemoryDocumentStore {
    applications: RwLock<HashMap<Uuid, Application>>,
    segments: RwLock<HashMap<Uuid, Segment>>,
    teams: RwLock<HashMap<Uuid, Team>>,
    principals: RwLock<HashMap<Uuid, Principal>>,
}

impl std::fmt::Debug for MemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDocumentStore").finish_non_exhaustive()
    }
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for MemoryDocumentStore {
    async fn save_application(&self, application: Application) -> StoreResult<()> {
        self.applications
            .write()
            .await
            .insert(application.id, application);
        Ok(())
    }

    async fn get_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        Ok(self.applications.read().await.get(&id).cloned())
    }

    async fn delete_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        Ok(self.applications.write().await.remove(&id))
    }

    async fn applications_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Application>> {
        let applications = self.applications.read().await;
        let mut found: Vec<Application> = applications
            .values()
            .filter(|a| a.user == owner)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }
}

#[async_trait]
impl SegmentStore for MemoryDocumentStore {
    async fn save_segment(&self, segment: Segment) -> StoreResult<()> {
        self.segments.write().await.insert(segment.id, segment);
        Ok(())
    }

    async fn get_segment(&self, id: Uuid) -> StoreResult<Option<Segment>> {
        Ok(self.segments.read().await.get(&id).cloned())
    }

    async fn delete_segment(&self, id: Uuid) -> StoreResult<Option<Segment>> {
        Ok(self.segments.write().await.remove(&id))
    }

    async fn segments_by_application(&self, application_id: Uuid) -> StoreResult<Vec<Segment>> {
        let segments = self.segments.read().await;
        let mut found: Vec<Segment> = segments
            .values()
            .filter(|s| s.belongs_to(application_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }
}

#[async_trait]
impl TeamStore for MemoryDocumentStore {
    async fn save_team(&self, team: Team) -> StoreResult<()> {
        self.teams.write().await.insert(team.id, team);
        Ok(())
    }

    async fn get_team(&self, id: Uuid) -> StoreResult<Option<Team>> {
        Ok(self.teams.read().await.get(&id).cloned())
    }

    async fn delete_team(&self, id: Uuid) -> StoreResult<Option<Team>> {
        Ok(self.teams.write().await.remove(&id))
    }

    async fn teams_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Team>> {
        let teams = self.teams.read().await;
        let mut found: Vec<Team> = teams.values().filter(|t| t.owner == owner).cloned().collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }
}

#[async_trait]
impl PrincipalDirectory for MemoryDocumentStore {
    async fn save_principal(&self, principal: Principal) -> StoreResult<()> {
        self.principals.write().await.insert(principal.id, principal);
        Ok(())
    }

    async fn get_principal(&self, id: Uuid) -> StoreResult<Option<Principal>> {
        Ok(self.principals.read().await.get(&id).cloned())
    }

    async fn children_of(&self, parent: Uuid, ids: &[Uuid]) -> StoreResult<Vec<Principal>> {
        let principals = self.principals.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| principals.get(id))
            .filter(|p| p.parent == Some(parent))
            .cloned()
            .collect())
    }
}
