//! Handler error type
//!
//! Maps component errors to HTTP responses with a `{"error": "..."}` body.
//! Server-side failures are logged in full and reported to the caller with
//! a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inference_engine::InferenceError;
use sensor_source::SourceError;
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Inference(InferenceError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Inference(InferenceError::ModelLoadError(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Source(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Inference(InferenceError::InvalidInput(msg)) => msg.clone(),
            ApiError::Inference(InferenceError::ModelLoadError(_)) => {
                error!(error = %self, "classifier unavailable");
                "prediction model unavailable".to_string()
            }
            ApiError::Inference(_) => {
                error!(error = %self, "inference failed");
                "inference failed".to_string()
            }
            ApiError::Storage(_) => {
                error!(error = %self, "storage failure");
                "storage unavailable".to_string()
            }
            ApiError::Source(_) => {
                error!(error = %self, "sensor source failure");
                "sensor source unavailable".to_string()
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
