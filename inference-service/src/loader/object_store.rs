//! Object store access for the remote artifact source
//!
//! The loader only needs one operation, "get the bytes stored under this
//! bucket and key". `HttpObjectStore` performs it as an unsigned path-style
//! `GET {endpoint}/{bucket}/{key}`, for stores that allow anonymous reads.
//! Signed access to S3 lives in [`super::s3`]. `MemoryObjectStore` serves
//! fixed objects from memory.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

/// Errors returned by an object store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    #[error("Access to {bucket}/{key} denied (HTTP {status})")]
    Denied {
        bucket: String,
        key: String,
        status: u16,
    },

    #[error("Object store returned HTTP {status} for {bucket}/{key}")]
    Status {
        bucket: String,
        key: String,
        status: u16,
    },

    #[error("Object store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Object store client error: {0}")]
    Backend(String),
}

/// Read-only access to objects by bucket and key
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full contents of an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError>;

    /// Human-readable location of the store, for logs
    fn endpoint(&self) -> &str;
}

/// Object store reached over plain HTTP(S)
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpObjectStore {
    /// Create a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// URL an object is fetched from
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, key)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        let url = self.object_url(bucket, key);
        debug!(url = %url, "Fetching object");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        match status {
            s if s.is_success() => {
                let body = response.bytes().await?;
                debug!(url = %url, bytes = body.len(), "Object fetched");
                Ok(body)
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Denied {
                bucket: bucket.to_string(),
                key: key.to_string(),
                status: status.as_u16(),
            }),
            _ => Err(StoreError::Status {
                bucket: bucket.to_string(),
                key: key.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// In-memory object store holding a fixed set of objects
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: HashMap<(String, String), Bytes>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, builder style.
    pub fn with_object(mut self, bucket: &str, key: &str, data: impl Into<Bytes>) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), data.into());
        self
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    fn endpoint(&self) -> &str {
        "memory"
    }
}
