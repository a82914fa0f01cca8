//! Access grant domain model
//!
//! A grant delegates access to one resource category of one application to
//! an account that does not own the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delegated access to an application's resource category.
///
/// The absence of a grant means no delegated access. Owners never need one.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use pushboard_org::{AccessGrant, SEGMENTS_CATEGORY};
///
/// let app_id = Uuid::now_v7();
/// let grantee = Uuid::now_v7();
/// let grant = AccessGrant::new(app_id, SEGMENTS_CATEGORY, grantee);
///
/// assert!(grant.entitled);
/// assert!(grant.is_for(app_id, "segments", grantee));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Unique grant ID
    pub id: Uuid,

    /// Application the grant applies to
    pub application_id: Uuid,

    /// Resource category tag, e.g. `"segments"`
    pub resource_category: String,

    /// Account receiving access
    pub grantee_id: Uuid,

    /// Whether the grant currently entitles access
    pub entitled: bool,

    /// Who issued the grant
    pub granted_by: Option<Uuid>,

    /// When the grant was issued
    pub granted_at: DateTime<Utc>,
}

impl AccessGrant {
    /// Creates an entitled grant.
    pub fn new(application_id: Uuid, resource_category: impl Into<String>, grantee_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            application_id,
            resource_category: resource_category.into(),
            grantee_id,
            entitled: true,
            granted_by: None,
            granted_at: Utc::now(),
        }
    }

    /// Record who issued the grant.
    pub fn with_granter(mut self, granter_id: Uuid) -> Self {
        self.granted_by = Some(granter_id);
        self
    }

    /// Mark the grant as not entitling access.
    pub fn suspended(mut self) -> Self {
        self.entitled = false;
        self
    }

    /// Check whether this grant is keyed by the given triple.
    pub fn is_for(&self, application_id: Uuid, resource_category: &str, grantee_id: Uuid) -> bool {
        self.application_id == application_id
            && self.resource_category == resource_category
            && self.grantee_id == grantee_id
    }
}
