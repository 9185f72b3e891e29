//! Integration tests for the HTTP surface: health, readiness, predict.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{app, get, mock_pipeline, post_json, send, Constant, Failing, Panicking, Silent};
use inference_service::labels::BINARY_LABELS;
use inference_service::state::LoadFailure;
use inference_service::{AppState, FailureCause, LabelPolicy, ModelHandle};
use serde_json::json;
use tower::ServiceExt;

fn unloaded() -> AppState {
    AppState::load_failed(
        LoadFailure {
            cause: FailureCause::NotFound,
            message: "Model artifact not found at /srv/model.bin".to_string(),
        },
        LabelPolicy::Binary,
    )
}

fn ready_with(model: ModelHandle) -> AppState {
    AppState::ready(model, LabelPolicy::Binary)
}

// ============================================================================
// Health / readiness
// ============================================================================

#[tokio::test]
async fn test_health_without_model() {
    let (status, body) = send(&app(unloaded()), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_health_with_model() {
    let (status, body) = send(&app(ready_with(Constant::new(1))), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_ready_reflects_model_state() {
    let (status, body) = send(&app(ready_with(Constant::new(1))), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["label_policy"], "binary");

    let (status, body) = send(&app(unloaded()), get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
    assert_eq!(body["cause"], "not-found");
}

#[tokio::test]
async fn test_metrics_endpoint_responds() {
    let response = app(unloaded()).oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Predict: model absent
// ============================================================================

#[tokio::test]
async fn test_predict_without_model_is_unavailable() {
    let (status, body) = send(
        &app(unloaded()),
        post_json("/predict", r#"{"text": "great"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Model not loaded");
}

#[tokio::test]
async fn test_malformed_body_without_model_is_still_client_error() {
    let (status, _) = send(&app(unloaded()), post_json("/predict", r#"{"txt": "great"}"#)).await;
    assert!(status.is_client_error());
}

// ============================================================================
// Predict: validation
// ============================================================================

#[tokio::test]
async fn test_malformed_bodies_never_reach_the_model() {
    let model = Constant::new(1);
    let app = app(ready_with(model.clone()));

    let cases = [
        r#"{}"#,
        r#"{"txt": "hello"}"#,
        r#"{"text": 42}"#,
        r#"{"text": null}"#,
        r#"{"text": ["a", "b"]}"#,
        r#""just a string""#,
        r#"{"text": "unterminated"#,
        "",
    ];

    for body in cases {
        let (status, response) = send(&app, post_json("/predict", body)).await;
        assert!(status.is_client_error(), "{body:?} gave {status}");
        assert!(response["error"].is_string(), "{body:?} gave {response}");
    }

    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_missing_text_is_unprocessable() {
    let app = app(ready_with(Constant::new(1)));
    let (status, _) = send(&app, post_json("/predict", r#"{"txt": "hello"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, post_json("/predict", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let model = Constant::new(1);
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::from(r#"{"text": "hello"}"#))
        .unwrap();

    let (status, _) = send(&app(ready_with(model.clone())), request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(model.calls(), 0);
}

// ============================================================================
// Predict: model present
// ============================================================================

#[tokio::test]
async fn test_predict_positive_and_negative() {
    let (status, body) = send(
        &app(ready_with(Constant::new(1))),
        post_json("/predict", r#"{"text": "lovely"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "lovely", "sentiment": "positive" }));

    let (status, body) = send(
        &app(ready_with(Constant::new(0))),
        post_json("/predict", r#"{"text": "dreadful"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "dreadful", "sentiment": "negative" }));
}

#[tokio::test]
async fn test_predict_calls_model_once_per_request() {
    let model = Constant::new(1);
    let app = app(ready_with(model.clone()));

    for _ in 0..3 {
        let (status, _) = send(&app, post_json("/predict", r#"{"text": "ok"}"#)).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(model.calls(), 3);
}

#[tokio::test]
async fn test_empty_text_is_valid() {
    let (status, body) = send(
        &app(ready_with(Arc::new(mock_pipeline()))),
        post_json("/predict", r#"{"text": ""}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "");
    assert!(BINARY_LABELS.contains(&body["sentiment"].as_str().unwrap()));
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let (status, body) = send(
        &app(ready_with(Constant::new(1))),
        post_json("/predict", r#"{"text": "fine", "lang": "en"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "fine", "sentiment": "positive" }));
}

#[tokio::test]
async fn test_unicode_text_is_echoed() {
    let text = "très bien 👍 \"quoted\"";
    let request = post_json("/predict", &json!({ "text": text }).to_string());

    let (status, body) = send(&app(ready_with(Constant::new(1))), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], text);
}

// ============================================================================
// Label policies
// ============================================================================

#[tokio::test]
async fn test_raw_label_policy_stringifies() {
    let state = AppState::ready(Constant::new(7), LabelPolicy::Raw);
    let (status, body) = send(&app(state), post_json("/predict", r#"{"text": "x"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "7");
}

#[tokio::test]
async fn test_binary_policy_rejects_unknown_label() {
    let (status, body) = send(
        &app(ready_with(Constant::new(7))),
        post_json("/predict", r#"{"text": "x"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains('7'));
}

// ============================================================================
// Prediction failures
// ============================================================================

#[tokio::test]
async fn test_model_error_is_internal_error() {
    let (status, body) = send(
        &app(ready_with(Arc::new(Failing))),
        post_json("/predict", r#"{"text": "x"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("internal model failure"));
}

#[tokio::test]
async fn test_empty_model_output_is_internal_error() {
    let (status, _) = send(
        &app(ready_with(Arc::new(Silent))),
        post_json("/predict", r#"{"text": "x"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_panicking_model_does_not_take_down_the_service() {
    let app = app(ready_with(Arc::new(Panicking)));

    for _ in 0..2 {
        let (status, _) = send(&app, post_json("/predict", r#"{"text": "x"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    // The handle is untouched; readiness still reports the model as loaded.
    let (status, _) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_predictions_are_independent() {
    let pipeline = mock_pipeline();
    let phrases = [
        "Amazing quality and fast delivery",
        "Worst product ever",
        "Highly recommend this",
        "Very disappointed",
        "Excellent customer support",
        "Awful experience",
        "Will buy again",
        "Not worth the money",
        "Perfect condition",
        "Terrible service",
    ];

    let requests: Vec<(String, String)> = (0..50)
        .map(|i| {
            let text = format!("{} #{i}", phrases[i % phrases.len()]);
            let raw = pipeline.predict_one(&text).unwrap();
            let expected = LabelPolicy::Binary.apply(raw).unwrap();
            (text, expected)
        })
        .collect();

    let app = app(ready_with(Arc::new(pipeline)));

    let handles: Vec<_> = requests
        .iter()
        .cloned()
        .map(|(text, expected)| {
            let app = app.clone();
            tokio::spawn(async move {
                let request = post_json("/predict", &json!({ "text": text }).to_string());
                let (status, body) = send(&app, request).await;
                (text, expected, status, body)
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        let (text, expected, status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], text);
        assert_eq!(body["sentiment"], expected);
        assert!(BINARY_LABELS.contains(&expected.as_str()));
        seen.insert(text);
    }
    assert_eq!(seen.len(), 50);
}
