//! Delegated access administration
//!
//! An application owner can let one of their child accounts into a resource
//! category of the application, and take that access back.

use pushboard_access::DelegationStore;
use pushboard_org::{AccessGrant, Application, Principal};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::store::PrincipalDirectory;

const NOT_APPLICATION_OWNER: &str = "Authorization error, you can not share this application.";
const UNKNOWN_GRANTEE: &str = "Grantee is incorrect. Make sure it is one of your accounts.";

/// Grant and revoke delegated access.
#[derive(Clone)]
pub struct SharingService {
    grants: Arc<dyn DelegationStore>,
    directory: Arc<dyn PrincipalDirectory>,
}

impl std::fmt::Debug for SharingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharingService").finish_non_exhaustive()
    }
}

impl SharingService {
    /// Create the service.
    pub fn new(grants: Arc<dyn DelegationStore>, directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self { grants, directory }
    }

    /// Give `grantee_id` access to `category` of `application`.
    ///
    /// Granting again replaces the earlier grant.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Forbidden`] if `principal` does not own the application
    /// - [`ServiceError::InvalidInput`] if the grantee is not a child account
    ///   of `principal`
    pub async fn grant(
        &self,
        principal: &Principal,
        application: &Application,
        category: &str,
        grantee_id: Uuid,
    ) -> ServiceResult<AccessGrant> {
        Self::require_owner(principal, application)?;
        let children = self.directory.children_of(principal.id, &[grantee_id]).await?;
        if children.is_empty() {
            return Err(ServiceError::InvalidInput(UNKNOWN_GRANTEE.to_string()));
        }

        let grant = AccessGrant::new(application.id, category, grantee_id).with_granter(principal.id);
        self.grants.put_grant(grant.clone()).await?;
        info!(
            application = %application.id,
            category,
            grantee = %grantee_id,
            "Access granted"
        );
        Ok(grant)
    }

    /// Take back access. Returns whether a grant existed.
    pub async fn revoke(
        &self,
        principal: &Principal,
        application: &Application,
        category: &str,
        grantee_id: Uuid,
    ) -> ServiceResult<bool> {
        Self::require_owner(principal, application)?;
        let revoked = self
            .grants
            .revoke_grant(application.id, category, grantee_id)
            .await?;
        if revoked {
            info!(
                application = %application.id,
                category,
                grantee = %grantee_id,
                "Access revoked"
            );
        }
        Ok(revoked)
    }

    /// Grants issued on `application`, oldest first.
    pub async fn list(&self, principal: &Principal, application: &Application) -> ServiceResult<Vec<AccessGrant>> {
        Self::require_owner(principal, application)?;
        Ok(self.grants.grants_for_application(application.id).await?)
    }

    fn require_owner(principal: &Principal, application: &Application) -> ServiceResult<()> {
        if application.is_owned_by(principal) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(NOT_APPLICATION_OWNER.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use pushboard_access::MemoryDelegationStore;
    use pushboard_org::{NewApplication, SEGMENTS_CATEGORY};
    use pushboard_rbac::Role;

    struct Fixture {
        service: SharingService,
        grants: Arc<MemoryDelegationStore>,
        owner: Principal,
        child: Principal,
        app: Application,
    }

    async fn fixture() -> Fixture {
        let grants = Arc::new(MemoryDelegationStore::new());
        let directory = Arc::new(MemoryDocumentStore::new());
        let owner = Principal::new("owner@example.com", Role::User);
        let child = Principal::child_of(&owner, "child@example.com");
        directory.save_principal(child.clone()).await.unwrap();
        let app = Application::create(NewApplication::new("Shop", "com.shop"), &owner, 20).unwrap();

        Fixture {
            service: SharingService::new(grants.clone(), directory),
            grants,
            owner,
            child,
            app,
        }
    }

    #[tokio::test]
    async fn test_grant_and_revoke() {
        let f = fixture().await;

        let grant = f
            .service
            .grant(&f.owner, &f.app, SEGMENTS_CATEGORY, f.child.id)
            .await
            .unwrap();
        assert_eq!(grant.granted_by, Some(f.owner.id));
        assert!(f
            .grants
            .find_grant(f.app.id, SEGMENTS_CATEGORY, f.child.id)
            .await
            .unwrap()
            .is_some());
        assert_eq!(f.service.list(&f.owner, &f.app).await.unwrap().len(), 1);

        assert!(f
            .service
            .revoke(&f.owner, &f.app, SEGMENTS_CATEGORY, f.child.id)
            .await
            .unwrap());
        assert!(!f
            .service
            .revoke(&f.owner, &f.app, SEGMENTS_CATEGORY, f.child.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_only_owner_can_share() {
        let f = fixture().await;
        let err = f
            .service
            .grant(&f.child, &f.app, SEGMENTS_CATEGORY, f.child.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(f.grants.stats().await.grants, 0);
    }

    #[tokio::test]
    async fn test_grantee_must_be_child_account() {
        let f = fixture().await;
        let stranger = Principal::new("stranger@example.com", Role::User);
        let err = f
            .service
            .grant(&f.owner, &f.app, SEGMENTS_CATEGORY, stranger.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), UNKNOWN_GRANTEE);
    }
}
