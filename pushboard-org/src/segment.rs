//! Segment domain models
//!
//! Segments are named audience slices of an application's devices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{required, OrgResult};

/// Resource category under which segment access is delegated.
pub const SEGMENTS_CATEGORY: &str = "segments";

const BLANK_NAME: &str = "Segment name can not be blank";

/// An audience slice of one application.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use pushboard_org::Segment;
///
/// let app_id = Uuid::now_v7();
/// let segment = Segment::new(app_id, "  Beta testers ").unwrap();
/// assert_eq!(segment.name, "Beta testers");
/// assert!(Segment::new(app_id, " ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Unique identifier
    pub id: Uuid,

    /// Name (trimmed, non-empty)
    pub name: String,

    /// Application the segment belongs to
    pub application: Uuid,

    /// Filters selecting the segment's devices
    #[serde(default)]
    pub filters: Vec<Uuid>,

    /// When the segment was created
    pub created_at: DateTime<Utc>,

    /// When the segment was last updated
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update of a segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentUpdate {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement filter list
    #[serde(default)]
    pub filters: Option<Vec<Uuid>>,
}

impl Segment {
    /// Creates a segment for `application`.
    pub fn new(application: Uuid, name: &str) -> OrgResult<Self> {
        Ok(Self {
            id: Uuid::now_v7(),
            name: required("name", name, BLANK_NAME)?,
            application,
            filters: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Set the filters.
    pub fn with_filters(mut self, filters: Vec<Uuid>) -> Self {
        self.filters = filters;
        self
    }

    /// Check whether the segment belongs to `application_id`.
    pub fn belongs_to(&self, application_id: Uuid) -> bool {
        self.application == application_id
    }

    /// Apply a partial update.
    pub fn apply(&mut self, update: SegmentUpdate) -> OrgResult<()> {
        if let Some(name) = update.name {
            self.name = required("name", &name, BLANK_NAME)?;
        }
        if let Some(filters) = update.filters {
            self.filters = filters;
        }
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}
