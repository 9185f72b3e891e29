//! Per-request errors and their HTTP mapping

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors a predict request can end in. None of them outlive the request.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation { status: StatusCode, message: String },

    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Prediction failed: {0}")]
    Prediction(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { status, .. } => *status,
            Self::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        Self::Validation {
            status: if status.is_client_error() {
                status
            } else {
                StatusCode::BAD_REQUEST
            },
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
