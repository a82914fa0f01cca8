//! Segment service
//!
//! Every operation passes the authorization gate for its route before the
//! segment store is touched.

use pushboard_access::AuthorizationGate;
use pushboard_org::{Application, Principal, Segment, SegmentUpdate, SEGMENTS_CATEGORY};
use pushboard_rbac::{Method, SEGMENTS_ROUTE, SEGMENT_ROUTE};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::loader::segment_by_id;
use crate::store::SegmentStore;

/// Fields accepted when creating a segment.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NewSegment {
    /// Segment name
    pub name: String,
    /// Filters selecting the segment's devices
    #[serde(default)]
    pub filters: Vec<Uuid>,
}

/// Segment operations, scoped to one application per call.
#[derive(Clone)]
pub struct SegmentService {
    segments: Arc<dyn SegmentStore>,
    gate: AuthorizationGate,
}

impl std::fmt::Debug for SegmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentService")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl SegmentService {
    /// Create the service.
    pub fn new(segments: Arc<dyn SegmentStore>, gate: AuthorizationGate) -> Self {
        Self { segments, gate }
    }

    async fn authorize(
        &self,
        principal: Option<&Principal>,
        route: &str,
        method: Method,
        application: &Application,
    ) -> ServiceResult<()> {
        self.gate
            .authorize(principal, route, method.as_str(), application, SEGMENTS_CATEGORY)
            .await
            .into_result()?;
        Ok(())
    }

    /// `GET /api/applications/:applicationId/segments`
    pub async fn list(
        &self,
        principal: Option<&Principal>,
        application: &Application,
    ) -> ServiceResult<Vec<Segment>> {
        self.authorize(principal, SEGMENTS_ROUTE, Method::Get, application)
            .await?;
        Ok(self.segments.segments_by_application(application.id).await?)
    }

    /// `POST /api/applications/:applicationId/segments`
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        application: &Application,
        input: NewSegment,
    ) -> ServiceResult<Segment> {
        self.authorize(principal, SEGMENTS_ROUTE, Method::Post, application)
            .await?;
        let segment = Segment::new(application.id, &input.name)?.with_filters(input.filters);
        self.segments.save_segment(segment.clone()).await?;
        info!(segment = %segment.id, application = %application.id, "Segment created");
        Ok(segment)
    }

    /// `GET /api/applications/:applicationId/segments/:segmentId`
    pub async fn read(
        &self,
        principal: Option<&Principal>,
        application: &Application,
        segment_id: &str,
    ) -> ServiceResult<Segment> {
        self.authorize(principal, SEGMENT_ROUTE, Method::Get, application)
            .await?;
        segment_by_id(self.segments.as_ref(), application, segment_id).await
    }

    /// `PUT /api/applications/:applicationId/segments/:segmentId`
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        application: &Application,
        segment_id: &str,
        update: SegmentUpdate,
    ) -> ServiceResult<Segment> {
        self.authorize(principal, SEGMENT_ROUTE, Method::Put, application)
            .await?;
        let mut segment = segment_by_id(self.segments.as_ref(), application, segment_id).await?;
        segment.apply(update)?;
        self.segments.save_segment(segment.clone()).await?;
        debug!(segment = %segment.id, "Segment updated");
        Ok(segment)
    }

    /// `DELETE /api/applications/:applicationId/segments/:segmentId`
    pub async fn delete(
        &self,
        principal: Option<&Principal>,
        application: &Application,
        segment_id: &str,
    ) -> ServiceResult<Segment> {
        self.authorize(principal, SEGMENT_ROUTE, Method::Delete, application)
            .await?;
        let segment = segment_by_id(self.segments.as_ref(), application, segment_id).await?;
        self.segments.delete_segment(segment.id).await?;
        info!(segment = %segment.id, application = %application.id, "Segment deleted");
        Ok(segment)
    }
}
