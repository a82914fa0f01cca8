//! Blob store
//!
//! Opaque storage for uploaded images. The services only ever put and delete
//! whole objects by key.

use async_trait::async_trait;
use pushboard_access::{StoreError, StoreResult};
use pushboard_org::Image;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct Upload {
    /// File name as sent by the client
    pub file_name: String,
    /// MIME type as sent by the client
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Create an upload.
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check if the upload has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Object storage for uploaded files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, returning the stored image record.
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> StoreResult<Image>;

    /// Remove the object under `key`. Returns whether it existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;
}

/// In-memory blob store.
pub struct MemoryBlobStore {
    base_url: String,
    objects: RwLock<HashMap<String, (String, Vec<u8>)>>,
}

impl std::fmt::Debug for MemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBlobStore")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MemoryBlobStore {
    /// Create a store whose objects are served under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Get the stored bytes and content type for `key`.
    pub async fn get(&self, key: &str) -> Option<(String, Vec<u8>)> {
        self.objects.read().await.get(key).cloned()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> StoreResult<Image> {
        if key.is_empty() {
            return Err(StoreError::Malformed("empty blob key".to_string()));
        }
        let size = bytes.len() as u64;
        self.objects
            .write()
            .await
            .insert(key.to_string(), (content_type.to_string(), bytes));

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), key);
        Ok(Image::new(key, url, content_type, size))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.objects.write().await.remove(key).is_some())
    }
}
