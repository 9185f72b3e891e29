//! Sentiment Inference Service
//!
//! Loads a sentiment model once at startup and serves predictions over HTTP:
//! - Model artifact from the local filesystem, S3, or a plain HTTP object store
//! - Fail-soft startup: a missing model never takes the health probe down
//! - Prometheus metrics and structured tracing
//!
//! Endpoints:
//! - GET /health - Liveness probe, always `{"status": "ok"}`
//! - GET /ready - Readiness probe (includes model status)
//! - POST /predict - `{"text": ...}` to `{"text": ..., "sentiment": ...}`
//! - GET /metrics - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod labels;
pub mod lifecycle;
pub mod loader;
pub mod metrics;
pub mod server;
pub mod state;
pub mod telemetry;

// Re-export commonly used items
pub use config::{LoadPolicy, ServiceConfig, SourceKind, StoreKind};
pub use error::ApiError;
pub use handlers::{SentimentRequest, SentimentResponse};
pub use labels::LabelPolicy;
pub use loader::{ArtifactSource, FailureCause, LoadError, ModelHandle};
pub use state::AppState;
