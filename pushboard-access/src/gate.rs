//! Authorization gate
//!
//! The per-request check placed in front of application sub-resource routes.
//! It runs the role table first and the resource check second, stopping at
//! the first stage that does not allow the request.
//!
//! # Decisions
//!
//! | Stage outcome                    | Decision                    | Status |
//! |----------------------------------|-----------------------------|--------|
//! | role table cannot evaluate       | `Error(RoleEvaluation)`     | 500    |
//! | role table denies                | `Deny(RoleDenied)`          | 403    |
//! | delegation store fails           | `Deny(ResourceLookup)`      | 403    |
//! | no ownership, no entitled grant  | `Deny(ResourceDenied)`      | 403    |
//! | both stages allow                | `Allow`                     | -      |
//!
//! Nothing is cached between calls, so grant changes apply to the very next
//! request.

use pushboard_org::{Application, Principal};
use pushboard_rbac::{PermissionMatcher, Role};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::{AccessError, AccessResult};
use crate::resolver::AccessResolver;

/// Outcome of an authorization check.
#[derive(Debug)]
pub enum Decision {
    /// Continue to the handler.
    Allow,
    /// Reject with 403.
    Deny(AccessError),
    /// Reject with 500; the authorization system failed.
    Error(AccessError),
}

impl Decision {
    /// Check if the request may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// The failure cause, if the request may not proceed.
    pub fn cause(&self) -> Option<&AccessError> {
        match self {
            Decision::Allow => None,
            Decision::Deny(err) | Decision::Error(err) => Some(err),
        }
    }

    /// HTTP status to respond with, or `None` to continue.
    pub fn status_code(&self) -> Option<u16> {
        self.cause().map(AccessError::status_code)
    }

    /// Convert into a `Result` for `?` propagation.
    pub fn into_result(self) -> AccessResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(err) | Decision::Error(err) => Err(err),
        }
    }
}

/// Role check followed by resource check.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use pushboard_access::{AuthorizationGate, MemoryDelegationStore, ResourceAccessResolver};
/// use pushboard_org::{Application, NewApplication, Principal, SEGMENTS_CATEGORY};
/// use pushboard_rbac::{Role, RoleTable, SEGMENTS_ROUTE};
///
/// # async fn example() {
/// let gate = AuthorizationGate::new(
///     Arc::new(RoleTable::segments_default()),
///     Arc::new(ResourceAccessResolver::new(Arc::new(MemoryDelegationStore::new()))),
/// );
///
/// let owner = Principal::new("owner@example.com", Role::User);
/// let app = Application::create(NewApplication::new("Shop", "com.shop"), &owner, 20).unwrap();
///
/// let decision = gate
///     .authorize(Some(&owner), SEGMENTS_ROUTE, "GET", &app, SEGMENTS_CATEGORY)
///     .await;
/// assert!(decision.is_allowed());
/// # }
/// ```
#[derive(Clone)]
pub struct AuthorizationGate {
    matcher: Arc<dyn PermissionMatcher>,
    resolver: Arc<dyn AccessResolver>,
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate").finish_non_exhaustive()
    }
}

impl AuthorizationGate {
    /// Create a gate from a role matcher and a resource resolver.
    pub fn new(matcher: Arc<dyn PermissionMatcher>, resolver: Arc<dyn AccessResolver>) -> Self {
        Self { matcher, resolver }
    }

    /// Authorize one request.
    ///
    /// # Arguments
    ///
    /// * `principal` - The authenticated caller, or `None` for a guest
    /// * `route_template` - Route template the request matched
    /// * `method` - Request method, e.g. `"GET"`
    /// * `application` - Application loaded from the route parameter
    /// * `resource_category` - Category the route serves, e.g. `"segments"`
    pub async fn authorize(
        &self,
        principal: Option<&Principal>,
        route_template: &str,
        method: &str,
        application: &Application,
        resource_category: &str,
    ) -> Decision {
        let role = principal.map(|p| p.role).unwrap_or(Role::Guest);
        let principal_id = principal.map(|p| p.id.to_string()).unwrap_or_default();

        match self.matcher.is_role_allowed(role, route_template, method) {
            Err(err) => {
                error!(
                    principal = %principal_id,
                    role = %role,
                    route = route_template,
                    method,
                    error = %err,
                    "Role evaluation failed"
                );
                return Decision::Error(AccessError::RoleEvaluation(err));
            }
            Ok(false) => {
                debug!(
                    principal = %principal_id,
                    role = %role,
                    route = route_template,
                    method,
                    "Denied by role table"
                );
                return Decision::Deny(AccessError::RoleDenied {
                    role,
                    route: route_template.to_string(),
                    method: method.to_string(),
                });
            }
            Ok(true) => {}
        }

        let denied = || AccessError::ResourceDenied {
            application_id: application.id,
            category: resource_category.to_string(),
        };

        // A guest has no identity to own or be granted anything, whether or
        // not the caller passed a principal record for it.
        let Some(principal) = principal.filter(|p| !p.role.is_anonymous()) else {
            debug!(
                application = %application.id,
                category = resource_category,
                "Guest denied at resource stage"
            );
            return Decision::Deny(denied());
        };

        match self
            .resolver
            .has_access(application, resource_category, principal)
            .await
        {
            Ok(true) => {
                debug!(
                    principal = %principal.id,
                    application = %application.id,
                    category = resource_category,
                    method,
                    "Access granted"
                );
                Decision::Allow
            }
            Ok(false) => {
                debug!(
                    principal = %principal.id,
                    application = %application.id,
                    category = resource_category,
                    "Denied at resource stage"
                );
                Decision::Deny(denied())
            }
            Err(err) => {
                warn!(
                    principal = %principal.id,
                    application = %application.id,
                    category = resource_category,
                    error = %err,
                    "Resource lookup failed, denying"
                );
                Decision::Deny(AccessError::ResourceLookup(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResourceAccessResolver;
    use crate::store::{DelegationStore, MemoryDelegationStore, StoreError, StoreResult};
    use async_trait::async_trait;
    use pushboard_org::{AccessGrant, NewApplication, SEGMENTS_CATEGORY};
    use pushboard_rbac::{RoleTable, SEGMENTS_ROUTE, SEGMENT_ROUTE};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Resolver wrapper counting how often the resource stage runs.
    struct CountingResolver {
        inner: ResourceAccessResolver,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AccessResolver for CountingResolver {
        async fn has_access(
            &self,
            application: &Application,
            resource_category: &str,
            principal: &Principal,
        ) -> StoreResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.has_access(application, resource_category, principal).await
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl DelegationStore for BrokenStore {
        async fn find_grant(&self, _: Uuid, _: &str, _: Uuid) -> StoreResult<Option<AccessGrant>> {
            Err(StoreError::Malformed("grant document missing entitled flag".into()))
        }
        async fn put_grant(&self, _: AccessGrant) -> StoreResult<()> {
            Ok(())
        }
        async fn revoke_grant(&self, _: Uuid, _: &str, _: Uuid) -> StoreResult<bool> {
            Ok(false)
        }
        async fn grants_for_application(&self, _: Uuid) -> StoreResult<Vec<AccessGrant>> {
            Ok(Vec::new())
        }
    }

    struct Fixture {
        gate: AuthorizationGate,
        store: Arc<MemoryDelegationStore>,
        resolver: Arc<CountingResolver>,
        owner: Principal,
        app: Application,
    }

    fn fixture_with_table(table: RoleTable) -> Fixture {
        let store = Arc::new(MemoryDelegationStore::new());
        let resolver = Arc::new(CountingResolver {
            inner: ResourceAccessResolver::new(store.clone()),
            calls: AtomicUsize::new(0),
        });
        let gate = AuthorizationGate::new(Arc::new(table), resolver.clone());
        let owner = Principal::new("owner@example.com", Role::User);
        let app = Application::create(NewApplication::new("Shop", "com.shop"), &owner, 20).unwrap();
        Fixture {
            gate,
            store,
            resolver,
            owner,
            app,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_table(RoleTable::segments_default())
    }

    #[tokio::test]
    async fn test_guest_denied_at_role_stage_only() {
        let f = fixture();

        let decision = f
            .gate
            .authorize(None, SEGMENTS_ROUTE, "GET", &f.app, SEGMENTS_CATEGORY)
            .await;

        assert!(matches!(decision, Decision::Deny(AccessError::RoleDenied { role: Role::Guest, .. })));
        assert_eq!(decision.status_code(), Some(403));
        assert_eq!(f.resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.store.stats().await.lookups, 0);
    }

    #[tokio::test]
    async fn test_non_owner_without_grant_denied_at_resource_stage() {
        let f = fixture();
        let stranger = Principal::new("stranger@example.com", Role::User);

        let decision = f
            .gate
            .authorize(Some(&stranger), SEGMENTS_ROUTE, "GET", &f.app, SEGMENTS_CATEGORY)
            .await;

        match &decision {
            Decision::Deny(AccessError::ResourceDenied {
                application_id,
                category,
            }) => {
                assert_eq!(*application_id, f.app.id);
                assert_eq!(category, SEGMENTS_CATEGORY);
            }
            other => panic!("unexpected decision: {other:?}"),
        }
        assert_eq!(f.resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.store.stats().await.lookups, 1);
    }

    #[tokio::test]
    async fn test_owner_allowed_without_store_query() {
        let f = fixture();

        let decision = f
            .gate
            .authorize(Some(&f.owner), SEGMENTS_ROUTE, "GET", &f.app, SEGMENTS_CATEGORY)
            .await;

        assert!(decision.is_allowed());
        assert_eq!(decision.status_code(), None);
        assert_eq!(f.resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.store.stats().await.lookups, 0);
    }

    #[tokio::test]
    async fn test_granted_child_account_allowed_until_revoked() {
        let f = fixture();
        let child = Principal::child_of(&f.owner, "child@example.com");
        f.store
            .put_grant(AccessGrant::new(f.app.id, SEGMENTS_CATEGORY, child.id))
            .await
            .unwrap();

        let decision = f
            .gate
            .authorize(Some(&child), SEGMENT_ROUTE, "DELETE", &f.app, SEGMENTS_CATEGORY)
            .await;
        assert!(decision.is_allowed());

        f.store
            .revoke_grant(f.app.id, SEGMENTS_CATEGORY, child.id)
            .await
            .unwrap();

        let decision = f
            .gate
            .authorize(Some(&child), SEGMENT_ROUTE, "DELETE", &f.app, SEGMENTS_CATEGORY)
            .await;
        assert!(matches!(decision, Decision::Deny(AccessError::ResourceDenied { .. })));
    }

    #[tokio::test]
    async fn test_unknown_method_is_system_error() {
        let f = fixture();

        let decision = f
            .gate
            .authorize(Some(&f.owner), SEGMENTS_ROUTE, "BREW", &f.app, SEGMENTS_CATEGORY)
            .await;

        assert!(matches!(decision, Decision::Error(AccessError::RoleEvaluation(_))));
        assert_eq!(decision.status_code(), Some(500));
        assert_eq!(f.resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_fails_closed() {
        let owner = Principal::new("owner@example.com", Role::User);
        let stranger = Principal::new("stranger@example.com", Role::Admin);
        let app = Application::create(NewApplication::new("Shop", "com.shop"), &owner, 20).unwrap();
        let gate = AuthorizationGate::new(
            Arc::new(RoleTable::segments_default()),
            Arc::new(ResourceAccessResolver::new(Arc::new(BrokenStore))),
        );

        let decision = gate
            .authorize(Some(&stranger), SEGMENTS_ROUTE, "GET", &app, SEGMENTS_CATEGORY)
            .await;

        assert!(matches!(decision, Decision::Deny(AccessError::ResourceLookup(_))));
        assert_eq!(decision.status_code(), Some(403));
        let err = decision.into_result().unwrap_err();
        assert_eq!(err.error_code(), "RESOURCE_LOOKUP_ERROR");
    }

    #[tokio::test]
    async fn test_role_missing_from_table_denied() {
        let f = fixture_with_table(RoleTable::default());

        let decision = f
            .gate
            .authorize(Some(&f.owner), SEGMENTS_ROUTE, "GET", &f.app, SEGMENTS_CATEGORY)
            .await;

        assert!(matches!(decision, Decision::Deny(AccessError::RoleDenied { .. })));
        assert_eq!(f.resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_guest_allowed_by_role_is_still_denied_at_resource_stage() {
        let table = RoleTable::new(vec![pushboard_rbac::RolePolicy::new(Role::Guest)
            .with_rule(pushboard_rbac::RoleRule::allow_all(SEGMENTS_ROUTE))])
        .unwrap();
        let f = fixture_with_table(table);

        let decision = f
            .gate
            .authorize(None, SEGMENTS_ROUTE, "GET", &f.app, SEGMENTS_CATEGORY)
            .await;

        assert!(matches!(decision, Decision::Deny(AccessError::ResourceDenied { .. })));
        assert_eq!(f.resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_guest_principal_record_denied_like_anonymous_guest() {
        let table = RoleTable::new(vec![pushboard_rbac::RolePolicy::new(Role::Guest)
            .with_rule(pushboard_rbac::RoleRule::allow_all(SEGMENTS_ROUTE))])
        .unwrap();
        let mut f = fixture_with_table(table);
        let guest = Principal::new("anon@example.com", Role::Guest);
        f.app.user = guest.id;

        let decision = f
            .gate
            .authorize(Some(&guest), SEGMENTS_ROUTE, "GET", &f.app, SEGMENTS_CATEGORY)
            .await;

        assert!(matches!(decision, Decision::Deny(AccessError::ResourceDenied { .. })));
        assert_eq!(f.resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.store.stats().await.lookups, 0);
    }

    #[tokio::test]
    async fn test_denials_look_identical_to_callers() {
        let f = fixture();
        let stranger = Principal::new("stranger@example.com", Role::User);

        let role_denied = f
            .gate
            .authorize(None, SEGMENTS_ROUTE, "GET", &f.app, SEGMENTS_CATEGORY)
            .await
            .into_result()
            .unwrap_err();
        let resource_denied = f
            .gate
            .authorize(Some(&stranger), SEGMENTS_ROUTE, "GET", &f.app, SEGMENTS_CATEGORY)
            .await
            .into_result()
            .unwrap_err();

        assert_eq!(role_denied.status_code(), resource_denied.status_code());
        assert_eq!(role_denied.body(), resource_denied.body());
        assert_ne!(role_denied.error_code(), resource_denied.error_code());
    }
}
