//! Artifact sources: where the model bytes come from

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use sentiment_model::ARTIFACT_KEY;
use tracing::debug;

use super::object_store::{HttpObjectStore, ObjectStore};
use super::s3::S3ObjectStore;
use super::{CorruptCause, LoadError};
use crate::config::{ServiceConfig, SourceKind, StoreKind};

/// A single place the artifact can be fetched from
#[derive(Clone)]
pub enum ArtifactSource {
    /// Object `ARTIFACT_KEY` in `bucket`
    Remote {
        store: Arc<dyn ObjectStore>,
        bucket: String,
    },
    /// File on the local filesystem
    Local { path: PathBuf },
}

impl ArtifactSource {
    /// Select the source the configuration asks for.
    ///
    /// The remote source needs a bucket, and the HTTP store an endpoint;
    /// their absence is a configuration failure of the load, not of config
    /// parsing.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, LoadError> {
        match config.source {
            SourceKind::Local => Ok(Self::Local {
                path: config.artifact_path(),
            }),
            SourceKind::Remote => {
                let bucket = config.bucket.clone().ok_or_else(|| {
                    LoadError::Config(format!(
                        "{} environment variable not set",
                        config.bucket_env
                    ))
                })?;
                let store: Arc<dyn ObjectStore> = match config.store {
                    StoreKind::S3 => Arc::new(
                        S3ObjectStore::from_env(
                            config.store_endpoint.as_deref(),
                            config.store_region.as_deref(),
                            config.store_timeout,
                        )
                        .await,
                    ),
                    StoreKind::Http => {
                        let endpoint = config.store_endpoint.as_deref().ok_or_else(|| {
                            LoadError::Config(
                                "MODEL_STORE_ENDPOINT must be set for the http store".to_string(),
                            )
                        })?;
                        Arc::new(
                            HttpObjectStore::new(endpoint, config.store_timeout)
                                .map_err(|cause| LoadError::SourceUnavailable { cause })?,
                        )
                    }
                };
                Ok(Self::remote(store, bucket))
            }
        }
    }

    pub fn remote(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self::Remote {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    /// Fetch the raw artifact bytes.
    pub async fn fetch(&self) -> Result<Bytes, LoadError> {
        match self {
            Self::Remote { store, bucket } => store
                .get_object(bucket, ARTIFACT_KEY)
                .await
                .map_err(|cause| LoadError::SourceUnavailable { cause }),
            Self::Local { path } => match tokio::fs::read(path).await {
                Ok(data) => {
                    debug!(path = %path.display(), bytes = data.len(), "Artifact read");
                    Ok(Bytes::from(data))
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(LoadError::NotFound { path: path.clone() })
                }
                Err(source) => Err(LoadError::Corrupt {
                    cause: CorruptCause::Read {
                        path: path.clone(),
                        source,
                    },
                }),
            },
        }
    }
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { store, bucket } => {
                write!(f, "{}/{}/{}", store.endpoint(), bucket, ARTIFACT_KEY)
            }
            Self::Local { path } => write!(f, "{}", path.display()),
        }
    }
}

impl fmt::Debug for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { bucket, .. } => f
                .debug_struct("Remote")
                .field("location", &self.to_string())
                .field("bucket", bucket)
                .finish(),
            Self::Local { path } => f.debug_struct("Local").field("path", path).finish(),
        }
    }
}
