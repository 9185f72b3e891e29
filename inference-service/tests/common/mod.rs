//! Shared helpers for the inference-service integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use inference_service::{server, AppState};
use sentiment_model::{artifact, dataset, ModelError, Predictor, SentimentPipeline};
use serde_json::Value;
use tower::ServiceExt;

/// Predictor that always returns the same label and counts its calls
pub struct Constant {
    label: i64,
    calls: AtomicUsize,
}

impl Constant {
    pub fn new(label: i64) -> Arc<Self> {
        Arc::new(Self {
            label,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Predictor for Constant {
    fn predict(&self, texts: &[String]) -> Result<Vec<i64>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.label; texts.len()])
    }
}

/// Predictor whose every call fails
pub struct Failing;

impl Predictor for Failing {
    fn predict(&self, _texts: &[String]) -> Result<Vec<i64>, ModelError> {
        Err(ModelError::Prediction("internal model failure".to_string()))
    }
}

/// Predictor that panics
pub struct Panicking;

impl Predictor for Panicking {
    fn predict(&self, _texts: &[String]) -> Result<Vec<i64>, ModelError> {
        panic!("predictor exploded")
    }
}

/// Predictor that returns no labels at all
pub struct Silent;

impl Predictor for Silent {
    fn predict(&self, _texts: &[String]) -> Result<Vec<i64>, ModelError> {
        Ok(Vec::new())
    }
}

/// Pipeline fitted on the fifteen-phrase mock corpus
pub fn mock_pipeline() -> SentimentPipeline {
    let (texts, labels) = dataset::mock_dataset();
    SentimentPipeline::fit(&texts, &labels).unwrap()
}

/// Encoded artifact of [`mock_pipeline`]
pub fn mock_artifact() -> Vec<u8> {
    artifact::encode(&mock_pipeline()).unwrap()
}

pub fn app(state: AppState) -> Router {
    server::router(Arc::new(state))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request through the router and decode the JSON body (or `Null`).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
