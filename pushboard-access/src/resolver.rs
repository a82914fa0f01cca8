//! Resource access resolution
//!
//! Decides whether a principal may act on a resource category of a specific
//! application: owners always may, everyone else needs an entitled grant.

use async_trait::async_trait;
use pushboard_org::{Application, Principal};
use std::sync::Arc;

use crate::store::{DelegationStore, StoreResult};

/// Per-application access check used by the authorization gate.
#[async_trait]
pub trait AccessResolver: Send + Sync {
    /// Check whether `principal` may act on `resource_category` of `application`.
    ///
    /// `Ok(false)` is a clean denial; `Err` means the answer is unknown.
    async fn has_access(
        &self,
        application: &Application,
        resource_category: &str,
        principal: &Principal,
    ) -> StoreResult<bool>;
}

/// Ownership-then-delegation resolver backed by a [`DelegationStore`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use pushboard_access::{AccessResolver, MemoryDelegationStore, ResourceAccessResolver};
/// use pushboard_org::{Application, NewApplication, Principal};
/// use pushboard_rbac::Role;
///
/// # async fn example() {
/// let resolver = ResourceAccessResolver::new(Arc::new(MemoryDelegationStore::new()));
/// let owner = Principal::new("owner@example.com", Role::User);
/// let app = Application::create(NewApplication::new("Shop", "com.shop"), &owner, 20).unwrap();
///
/// assert!(resolver.has_access(&app, "segments", &owner).await.unwrap());
/// # }
/// ```
#[derive(Clone)]
pub struct ResourceAccessResolver {
    store: Arc<dyn DelegationStore>,
}

impl std::fmt::Debug for ResourceAccessResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceAccessResolver").finish_non_exhaustive()
    }
}

impl ResourceAccessResolver {
    /// Create a resolver reading grants from `store`.
    pub fn new(store: Arc<dyn DelegationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccessResolver for ResourceAccessResolver {
    async fn has_access(
        &self,
        application: &Application,
        resource_category: &str,
        principal: &Principal,
    ) -> StoreResult<bool> {
        if application.is_owned_by(principal) {
            return Ok(true);
        }

        let grant = self
            .store
            .find_grant(application.id, resource_category, principal.id)
            .await?;

        Ok(grant.map(|g| g.entitled).unwrap_or(false))
    }
}
