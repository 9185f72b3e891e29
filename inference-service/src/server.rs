//! HTTP server for sentiment inference

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::ServiceConfig;
use crate::handlers::{health, predict, ready};
use crate::lifecycle;
use crate::metrics::metrics_handler;
use crate::state::AppState;

/// Build the service router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/predict", post(predict))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Load the model, serve until a shutdown signal, then release the model.
pub async fn run(config: ServiceConfig) -> Result<()> {
    // Startup barrier: nothing is bound until loading has settled.
    let state = Arc::new(
        lifecycle::startup(&config)
            .await
            .context("Model load failed under fail-hard policy")?,
    );

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!(
        bind_addr = %config.bind_addr,
        model_ready = state.is_ready(),
        "Inference service starting"
    );
    info!("API endpoints:");
    info!("  GET  /health  - Liveness probe");
    info!("  GET  /ready   - Readiness probe");
    info!("  POST /predict - Sentiment prediction");
    info!("  GET  /metrics - Prometheus metrics");

    serve(listener, Arc::clone(&state), lifecycle::shutdown_signal()).await?;

    lifecycle::shutdown(state);
    Ok(())
}

/// Serve `state` on `listener` until `shutdown` resolves and in-flight
/// requests have completed.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server failed")
}
