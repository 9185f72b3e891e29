//! Shared application state for the inference service.
//!
//! The state is built once, after the model loader has finished, and is
//! never mutated afterwards. Handlers share it through an `Arc`, so the
//! model handle is read concurrently without locking.

use chrono::{DateTime, Utc};

use crate::labels::LabelPolicy;
use crate::loader::{FailureCause, LoadError, ModelHandle};

/// Summary of a startup load failure, kept for readiness reporting
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadFailure {
    pub cause: FailureCause,
    pub message: String,
}

impl From<&LoadError> for LoadFailure {
    fn from(err: &LoadError) -> Self {
        Self {
            cause: err.cause(),
            message: err.to_string(),
        }
    }
}

/// Terminal outcome of the startup load
#[derive(Clone, Debug)]
pub enum ModelSlot {
    Ready(ModelHandle),
    LoadFailed(LoadFailure),
}

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    model: ModelSlot,

    /// Raw label to response label mapping
    label_policy: LabelPolicy,

    /// Service start time for uptime calculations
    started_at: DateTime<Utc>,
}

impl AppState {
    /// State with a loaded model.
    pub fn ready(model: ModelHandle, label_policy: LabelPolicy) -> Self {
        Self::new(ModelSlot::Ready(model), label_policy)
    }

    /// State after a failed load; predictions are rejected until restart.
    pub fn load_failed(failure: LoadFailure, label_policy: LabelPolicy) -> Self {
        Self::new(ModelSlot::LoadFailed(failure), label_policy)
    }

    fn new(model: ModelSlot, label_policy: LabelPolicy) -> Self {
        Self {
            model,
            label_policy,
            started_at: Utc::now(),
        }
    }

    /// The model handle, if loading succeeded.
    pub fn model(&self) -> Option<&ModelHandle> {
        match &self.model {
            ModelSlot::Ready(model) => Some(model),
            ModelSlot::LoadFailed(_) => None,
        }
    }

    /// The load failure, if loading failed.
    pub fn load_failure(&self) -> Option<&LoadFailure> {
        match &self.model {
            ModelSlot::Ready(_) => None,
            ModelSlot::LoadFailed(failure) => Some(failure),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model().is_some()
    }

    pub fn label_policy(&self) -> LabelPolicy {
        self.label_policy
    }

    /// Get service uptime in seconds.
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
