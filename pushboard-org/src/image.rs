//! Uploaded image records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image stored in the blob store, as attached to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Unique image ID
    pub id: Uuid,

    /// Blob store key
    pub key: String,

    /// Public URL the blob store serves the image from
    pub url: String,

    /// MIME type reported at upload
    pub content_type: String,

    /// Size in bytes
    pub size: u64,

    /// When the image was uploaded
    pub uploaded_at: DateTime<Utc>,
}

impl Image {
    /// Creates a new image record.
    pub fn new(
        key: impl Into<String>,
        url: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            key: key.into(),
            url: url.into(),
            content_type: content_type.into(),
            size,
            uploaded_at: Utc::now(),
        }
    }
}
