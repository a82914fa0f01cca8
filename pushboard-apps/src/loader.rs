//! Route-parameter loaders
//!
//! Resolve the `:applicationId`, `:teamId` and `:segmentId` path parameters
//! into documents before any handler or authorization check runs.

use pushboard_org::{Application, Segment, Team};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{ApplicationStore, SegmentStore, TeamStore};

fn parse_id(raw: &str, invalid: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::InvalidIdentifier(invalid.to_string()))
}

/// Load the application named by an `:applicationId` parameter.
///
/// # Errors
///
/// - [`ServiceError::InvalidIdentifier`] if `raw_id` is not a valid ID
/// - [`ServiceError::NotFound`] if no such application exists
pub async fn application_by_id(
    store: &dyn ApplicationStore,
    raw_id: &str,
) -> ServiceResult<Application> {
    let id = parse_id(raw_id, "Application is invalid")?;
    store.get_application(id).await?.ok_or_else(|| {
        ServiceError::NotFound("No application with that identifier has been found".to_string())
    })
}

/// Load the team named by a `:teamId` parameter.
pub async fn team_by_id(store: &dyn TeamStore, raw_id: &str) -> ServiceResult<Team> {
    let id = parse_id(raw_id, "Team is invalid")?;
    store
        .get_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Failed to load team {}", raw_id)))
}

/// Load the segment named by a `:segmentId` parameter within `application`.
///
/// A segment of another application is reported as not found.
pub async fn segment_by_id(
    store: &dyn SegmentStore,
    application: &Application,
    raw_id: &str,
) -> ServiceResult<Segment> {
    let id = parse_id(raw_id, "Segment is invalid")?;
    store
        .get_segment(id)
        .await?
        .filter(|s| s.belongs_to(application.id))
        .ok_or_else(|| {
            ServiceError::NotFound("No segment with that identifier has been found".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use pushboard_org::{NewApplication, Principal};
    use pushboard_rbac::Role;

    async fn seeded() -> (MemoryDocumentStore, Application) {
        let store = MemoryDocumentStore::new();
        let owner = Principal::new("owner@example.com", Role::User);
        let app = Application::create(NewApplication::new("Shop", "com.shop"), &owner, 20).unwrap();
        store.save_application(app.clone()).await.unwrap();
        (store, app)
    }

    #[tokio::test]
    async fn test_application_by_id() {
        let (store, app) = seeded().await;
        let loaded = application_by_id(&store, &app.id.to_string()).await.unwrap();
        assert_eq!(loaded.id, app.id);
    }

    #[tokio::test]
    async fn test_application_by_id_invalid() {
        let (store, _) = seeded().await;
        let err = application_by_id(&store, "123").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Application is invalid");
    }

    #[tokio::test]
    async fn test_application_by_id_missing() {
        let (store, _) = seeded().await;
        let err = application_by_id(&store, &Uuid::now_v7().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(
            err.to_string(),
            "No application with that identifier has been found"
        );
    }

    #[tokio::test]
    async fn test_deleted_application_fails_closed() {
        let (store, app) = seeded().await;
        store.delete_application(app.id).await.unwrap();
        let err = application_by_id(&store, &app.id.to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_segment_of_other_application_not_found() {
        let (store, app) = seeded().await;
        let foreign = Segment::new(Uuid::now_v7(), "Foreign").unwrap();
        store.save_segment(foreign.clone()).await.unwrap();

        let err = segment_by_id(&store, &app, &foreign.id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_team_by_id_invalid() {
        let store = MemoryDocumentStore::new();
        let err = team_by_id(&store, "not-a-team").await.unwrap_err();
        assert_eq!(err.to_string(), "Team is invalid");
    }
}
