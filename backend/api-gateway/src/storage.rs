/// Object storage behind `/docs`
///
/// Uploads are written once under a generated key and read back whole.
/// S3 (or any S3-compatible endpoint) in deployments; an in-process map
/// for development and tests.
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file '{key}' not found in bucket '{bucket}'")]
    NotFound { bucket: String, key: String },

    #[error("bucket '{0}' is not available")]
    MissingBucket(String),

    #[error("invalid object name: {0}")]
    InvalidKey(String),

    #[error("object store error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError>;
}

/// Reject names that could escape the bucket or break the URL
pub fn validate_key(raw: &str) -> Result<(), StorageError> {
    if raw.is_empty()
        || raw.contains('/')
        || raw.contains('\\')
        || raw == "."
        || raw == ".."
        || raw.chars().any(char::is_control)
    {
        return Err(StorageError::InvalidKey(raw.to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration (credentials chain,
    /// `AWS_REGION`), optionally pointed at a custom endpoint.
    pub async fn from_env(region: Option<String>, endpoint: Option<String>) -> Self {
        let mut loader = aws_config::from_env();
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            info!(endpoint = %endpoint, "Using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                debug!(bucket, error = %DisplayErrorContext(&e), "head_bucket failed");
                StorageError::MissingBucket(bucket.to_string())
            })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(se) if se.is_no_such_key() => StorageError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                },
                _ => StorageError::Backend(DisplayErrorContext(&e).to_string()),
            })?;

        let content_type = output
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?
            .into_bytes();

        Ok(StoredObject { body, content_type })
    }
}

/// Any bucket name is accepted
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}
