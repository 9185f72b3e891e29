//! HTTP request handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SentimentResponse {
    pub text: String,
    pub sentiment: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Liveness probe. Independent of model state.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe (reports model availability)
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.load_failure() {
        None => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "label_policy": state.label_policy().as_str(),
                "uptime_secs": state.uptime_secs(),
            })),
        ),
        Some(failure) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unavailable",
                "cause": failure.cause.as_str(),
                "error": failure.message,
                "uptime_secs": state.uptime_secs(),
            })),
        ),
    }
}

/// Predict the sentiment of one text
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SentimentRequest>, JsonRejection>,
) -> Result<Json<SentimentResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(
            status = %rejection.status(),
            error = %rejection.body_text(),
            "Rejected predict request"
        );
        ApiError::from(rejection)
    })?;

    let Some(model) = state.model() else {
        metrics::record_unavailable();
        warn!("Predict rejected: model not loaded");
        return Err(ApiError::ModelUnavailable);
    };

    let request_id = Uuid::new_v4();
    let model = Arc::clone(model);
    let texts = vec![request.text.clone()];
    let started = Instant::now();

    // CPU-bound; a panic inside the model only fails this task.
    let outcome = tokio::task::spawn_blocking(move || model.predict(&texts))
        .await
        .map_err(|e| {
            metrics::record_prediction_failure();
            error!(request_id = %request_id, error = %e, "Prediction task aborted");
            ApiError::Prediction("prediction task aborted".to_string())
        })?;

    let labels = outcome.map_err(|e| {
        metrics::record_prediction_failure();
        error!(request_id = %request_id, error = %e, "Model prediction failed");
        ApiError::Prediction(e.to_string())
    })?;

    let raw = labels.first().copied().ok_or_else(|| {
        metrics::record_prediction_failure();
        error!(request_id = %request_id, "Model returned no label");
        ApiError::Prediction("model returned no label".to_string())
    })?;

    let sentiment = state.label_policy().apply(raw).map_err(|e| {
        metrics::record_prediction_failure();
        error!(request_id = %request_id, raw_label = raw, error = %e, "Label mapping failed");
        ApiError::Prediction(e.to_string())
    })?;

    let latency = started.elapsed();
    metrics::record_prediction(&sentiment, latency);
    debug!(
        request_id = %request_id,
        raw_label = raw,
        sentiment = %sentiment,
        latency_us = latency.as_micros(),
        "Prediction served"
    );

    Ok(Json(SentimentResponse {
        text: request.text,
        sentiment,
    }))
}
