//! Startup and shutdown of the model handle
//!
//! Startup runs the loader exactly once, before the listener accepts any
//! traffic, and turns the outcome into an immutable [`AppState`]:
//!
//! ```text
//! Unloaded -> Loading -> Ready
//!                     -> LoadFailed   (fail-soft: keep serving, predict = 503)
//!                     -> abort        (fail-hard)
//! ```
//!
//! Both terminal states last for the life of the process.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::config::{LoadPolicy, ServiceConfig};
use crate::labels::LabelPolicy;
use crate::loader::{self, ArtifactSource, LoadError, ModelHandle};
use crate::metrics;
use crate::state::{AppState, LoadFailure};

/// Load the model the configuration points at and build the service state.
///
/// Returns an error only under [`LoadPolicy::FailHard`].
pub async fn startup(config: &ServiceConfig) -> Result<AppState, LoadError> {
    let started = Instant::now();

    let outcome = match ArtifactSource::from_config(config).await {
        Ok(source) => load_from(&source).await,
        Err(e) => Err(e),
    };

    settle(outcome, config.load_policy, config.label_policy, started.elapsed())
}

/// Same as [`startup`], with an already constructed source.
pub async fn startup_with_source(
    source: &ArtifactSource,
    load_policy: LoadPolicy,
    label_policy: LabelPolicy,
) -> Result<AppState, LoadError> {
    let started = Instant::now();
    let outcome = load_from(source).await;
    settle(outcome, load_policy, label_policy, started.elapsed())
}

async fn load_from(source: &ArtifactSource) -> Result<ModelHandle, LoadError> {
    info!(source = %source, "Loading model artifact");
    loader::load(source).await
}

fn settle(
    outcome: Result<ModelHandle, LoadError>,
    load_policy: LoadPolicy,
    label_policy: LabelPolicy,
    elapsed: Duration,
) -> Result<AppState, LoadError> {
    match outcome {
        Ok(model) => {
            info!(
                elapsed_ms = elapsed.as_millis(),
                label_policy = label_policy.as_str(),
                "Model loaded"
            );
            metrics::set_model_loaded(true);
            Ok(AppState::ready(model, label_policy))
        }
        Err(e) => {
            let cause = e.cause();
            metrics::record_load_failure(cause);

            match load_policy {
                LoadPolicy::FailSoft => {
                    error!(
                        cause = %cause,
                        error = %e,
                        elapsed_ms = elapsed.as_millis(),
                        "Model failed to load; serving without a model until restart"
                    );
                    Ok(AppState::load_failed(LoadFailure::from(&e), label_policy))
                }
                LoadPolicy::FailHard => {
                    error!(
                        cause = %cause,
                        error = %e,
                        elapsed_ms = elapsed.as_millis(),
                        "Model failed to load; aborting startup"
                    );
                    Err(e)
                }
            }
        }
    }
}

/// Release the model handle once the server has drained.
pub fn shutdown(state: Arc<AppState>) {
    let ready = state.is_ready();
    match Arc::try_unwrap(state) {
        Ok(state) => drop(state),
        Err(shared) => warn!(
            references = Arc::strong_count(&shared),
            "Application state still shared at shutdown"
        ),
    }
    metrics::set_model_loaded(false);
    info!(model_released = ready, "Inference service stopped");
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");
}
