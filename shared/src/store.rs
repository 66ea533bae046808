//! Blob store access: an S3-backed store and an in-memory one.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Error, Result};

/// Key-value store holding whole JSON documents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing whatever was there.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
}

/// Blob store backed by a single S3 bucket.
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let output = match response {
            Ok(output) => output,
            Err(SdkError::ServiceError(err)) if err.err().is_no_such_key() => {
                debug!("No object at s3://{}/{}", self.bucket, key);
                return Ok(None);
            }
            Err(e) => return Err(Error::Storage(format!("Failed to get object: {}", e))),
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| Error::Storage(format!("Failed to read object body: {}", e)))?
            .into_bytes();

        Ok(Some(bytes.to_vec()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(value))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Failed to put object: {}", e)))?;

        Ok(())
    }
}

/// Blob store kept in process memory. Used by tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_get_missing() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("events").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_overwrites() {
        let store = MemoryBlobStore::new();
        store.put("events", b"first".to_vec()).await.unwrap();
        store.put("events", b"second".to_vec()).await.unwrap();
        assert_eq!(store.get("events").await.unwrap(), Some(b"second".to_vec()));
    }
}
