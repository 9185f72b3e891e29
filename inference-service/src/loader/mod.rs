//! Model loader
//!
//! Resolves the artifact from its source, decodes it, and hands back a
//! shareable model handle. Loading happens once, during startup; see
//! [`crate::lifecycle`] for how failures are turned into service state.

mod object_store;
mod s3;
mod source;

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use sentiment_model::{artifact, ArtifactError, Predictor};
use thiserror::Error;
use tracing::debug;

pub use object_store::{HttpObjectStore, MemoryObjectStore, ObjectStore, StoreError};
pub use s3::S3ObjectStore;
pub use source::ArtifactSource;

/// Loaded, read-only predictor shared by all requests
pub type ModelHandle = Arc<dyn Predictor>;

/// Why an artifact could not be turned into a model
#[derive(Error, Debug)]
pub enum CorruptCause {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] ArtifactError),
}

/// Errors that can occur while loading the model
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model source unavailable: {cause}")]
    SourceUnavailable {
        #[source]
        cause: StoreError,
    },

    #[error("Model artifact not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Model artifact is corrupt: {cause}")]
    Corrupt {
        #[source]
        cause: CorruptCause,
    },
}

/// Operator-facing classification of a load failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureCause {
    Configuration,
    SourceUnavailable,
    NotFound,
    Permission,
    Corruption,
}

impl FailureCause {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::SourceUnavailable => "source-unavailable",
            Self::NotFound => "not-found",
            Self::Permission => "permission",
            Self::Corruption => "corruption",
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LoadError {
    /// Classify the failure for logs and readiness reporting.
    pub fn cause(&self) -> FailureCause {
        match self {
            Self::Config(_) => FailureCause::Configuration,
            Self::SourceUnavailable { cause } => match cause {
                StoreError::NotFound { .. } => FailureCause::NotFound,
                StoreError::Denied { .. } => FailureCause::Permission,
                StoreError::Status { .. }
                | StoreError::Transport(_)
                | StoreError::Backend(_) => FailureCause::SourceUnavailable,
            },
            Self::NotFound { .. } => FailureCause::NotFound,
            Self::Corrupt {
                cause: CorruptCause::Read { source, .. },
            } if source.kind() == ErrorKind::PermissionDenied => FailureCause::Permission,
            Self::Corrupt { .. } => FailureCause::Corruption,
        }
    }
}

/// Fetch and decode the artifact from `source`.
pub async fn load(source: &ArtifactSource) -> Result<ModelHandle, LoadError> {
    let bytes = source.fetch().await?;

    let pipeline = artifact::decode(&bytes).map_err(|e| LoadError::Corrupt { cause: e.into() })?;
    debug!(
        source = %source,
        features = pipeline.num_features(),
        classes = ?pipeline.classes(),
        "Artifact decoded into pipeline"
    );

    Ok(Arc::new(pipeline))
}
