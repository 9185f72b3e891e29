//! Prometheus metrics for inference service observability
//!
//! Exposes metrics at /metrics endpoint for scraping by Prometheus.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::time::Duration;

use crate::loader::FailureCause;

/// Global Prometheus handle
static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Metric names
pub const PREDICTIONS_TOTAL: &str = "sentiment_predictions_total";
pub const PREDICTION_FAILURES: &str = "sentiment_prediction_failures_total";
pub const PREDICTION_LATENCY: &str = "sentiment_prediction_latency_seconds";
pub const UNAVAILABLE_TOTAL: &str = "sentiment_model_unavailable_total";
pub const MODEL_LOADED: &str = "sentiment_model_loaded";
pub const MODEL_LOAD_FAILURES: &str = "sentiment_model_load_failures_total";

/// Initialize the metrics system. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), BuildError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);

    // Describe metrics for Prometheus
    describe_counter!(PREDICTIONS_TOTAL, "Predictions served, by sentiment label");
    describe_counter!(PREDICTION_FAILURES, "Predictions that failed inside the model");
    describe_histogram!(PREDICTION_LATENCY, "Model prediction latency in seconds");
    describe_counter!(UNAVAILABLE_TOTAL, "Predict requests rejected because no model is loaded");
    describe_gauge!(MODEL_LOADED, "1 when a model is loaded, 0 otherwise");
    describe_counter!(MODEL_LOAD_FAILURES, "Startup model load failures, by cause");

    tracing::info!("Metrics system initialized");
    Ok(())
}

/// Handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    METRICS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

// ============================================================================
// Model Metrics
// ============================================================================

/// Record the startup load outcome
pub fn set_model_loaded(loaded: bool) {
    gauge!(MODEL_LOADED).set(if loaded { 1.0 } else { 0.0 });
}

/// Record a startup load failure
pub fn record_load_failure(cause: FailureCause) {
    counter!(MODEL_LOAD_FAILURES, "cause" => cause.as_str()).increment(1);
    set_model_loaded(false);
}

// ============================================================================
// Prediction Metrics
// ============================================================================

/// Record a served prediction
pub fn record_prediction(sentiment: &str, latency: Duration) {
    counter!(PREDICTIONS_TOTAL, "sentiment" => sentiment.to_string()).increment(1);
    histogram!(PREDICTION_LATENCY).record(latency.as_secs_f64());
}

/// Record a prediction that failed inside the model
pub fn record_prediction_failure() {
    counter!(PREDICTION_FAILURES).increment(1);
}

/// Record a predict request rejected for lack of a model
pub fn record_unavailable() {
    counter!(UNAVAILABLE_TOTAL).increment(1);
}
