//! Access delegation store
//!
//! This module provides the store abstraction grants are read from, and an
//! in-memory implementation for single-process deployments and tests.

use async_trait::async_trait;
use pushboard_org::AccessGrant;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded
    #[error("Malformed record: {0}")]
    Malformed(String),

    /// A write conflicted with an existing record
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted grants, keyed by (application, resource category, grantee).
///
/// Only [`find_grant`](DelegationStore::find_grant) is used to authorize
/// requests. The write operations serve administrative flows.
#[async_trait]
pub trait DelegationStore: Send + Sync {
    /// Find the grant for the triple, if any.
    async fn find_grant(
        &self,
        application_id: Uuid,
        resource_category: &str,
        principal_id: Uuid,
    ) -> StoreResult<Option<AccessGrant>>;

    /// Insert a grant, replacing any grant for the same triple.
    async fn put_grant(&self, grant: AccessGrant) -> StoreResult<()>;

    /// Remove the grant for the triple. Returns whether one existed.
    async fn revoke_grant(
        &self,
        application_id: Uuid,
        resource_category: &str,
        principal_id: Uuid,
    ) -> StoreResult<bool>;

    /// All grants on an application.
    async fn grants_for_application(&self, application_id: Uuid) -> StoreResult<Vec<AccessGrant>>;
}

/// Delegation store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelegationStoreStats {
    /// Number of `find_grant` calls served
    pub lookups: u64,
    /// Grants currently stored
    pub grants: usize,
}

type GrantKey = (Uuid, String, Uuid);

/// In-memory delegation store.
///
/// This is suitable for single-process applications and testing.
#[derive(Default)]
pub struct MemoryDelegationStore {
    /// Grants by key
    grants: Arc<RwLock<HashMap<GrantKey, AccessGrant>>>,
    /// `find_grant` call count
    lookups: AtomicU64,
}

impl std::fmt::Debug for MemoryDelegationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDelegationStore")
            .field("lookups", &self.lookups.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemoryDelegationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get store statistics.
    pub async fn stats(&self) -> DelegationStoreStats {
        DelegationStoreStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            grants: self.grants.read().await.len(),
        }
    }

    fn key(application_id: Uuid, resource_category: &str, principal_id: Uuid) -> GrantKey {
        (application_id, resource_category.to_string(), principal_id)
    }
}

#[async_trait]
impl DelegationStore for MemoryDelegationStore {
    async fn find_grant(
        &self,
        application_id: Uuid,
        resource_category: &str,
        principal_id: Uuid,
    ) -> StoreResult<Option<AccessGrant>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let grants = self.grants.read().await;
        Ok(grants
            .get(&Self::key(application_id, resource_category, principal_id))
            .cloned())
    }

    async fn put_grant(&self, grant: AccessGrant) -> StoreResult<()> {
        let key = Self::key(grant.application_id, &grant.resource_category, grant.grantee_id);
        self.grants.write().await.insert(key, grant);
        Ok(())
    }

    async fn revoke_grant(
        &self,
        application_id: Uuid,
        resource_category: &str,
        principal_id: Uuid,
    ) -> StoreResult<bool> {
        let mut grants = self.grants.write().await;
        Ok(grants
            .remove(&Self::key(application_id, resource_category, principal_id))
            .is_some())
    }

    async fn grants_for_application(&self, application_id: Uuid) -> StoreResult<Vec<AccessGrant>> {
        let grants = self.grants.read().await;
        let mut found: Vec<AccessGrant> = grants
            .values()
            .filter(|g| g.application_id == application_id)
            .cloned()
            .collect();
        found.sort_by_key(|g| g.granted_at);
        Ok(found)
    }
}
