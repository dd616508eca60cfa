//! Blob storage for uploaded images.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Refusing to store an empty upload: {0}")]
    EmptyUpload(String),
    #[error("Blob not found: {0}")]
    NotFound(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Object storage seam. Implementations return the public URL of a stored blob.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, path: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Result<String, StorageError>;

    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}

/// `custom-orders/{timestamp}_{filename}`
pub fn custom_order_image_path(at: DateTime<Utc>, filename: &str) -> String {
    format!("custom-orders/{}_{}", at.timestamp_millis(), filename)
}

/// `products/{timestamp}-{sanitized filename}`
pub fn product_image_path(at: DateTime<Utc>, filename: &str) -> String {
    format!("products/{}-{}", at.timestamp_millis(), sanitize_filename(filename))
}

/// Replaces anything outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Process-local blob store.
#[derive(Debug)]
pub struct InMemoryBlobStore {
    base_url: String,
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, path: &str) -> Option<StoredBlob> {
        self.blobs.read().await.get(path).cloned()
    }

    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.blobs.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    async fn put(&self, path: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Result<String, StorageError> {
        if bytes.is_empty() {
            return Err(StorageError::EmptyUpload(path.to_string()));
        }
        self.blobs.write().await.insert(
            path.to_string(),
            StoredBlob {
                content_type: content_type.map(str::to_string),
                bytes,
            },
        );
        debug!("Blob stored");
        Ok(format!("{}/{}", self.base_url, path))
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        match self.blobs.write().await.remove(path) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(path.to_string())),
        }
    }
}
