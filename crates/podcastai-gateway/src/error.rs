//! Boundary error taxonomy: every failure leaving the gateway maps to one
//! of four kinds with an HTTP status and a human-readable JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use podcastai_core::LlmError;
use podcastai_voice::VoiceError;

/// Client-facing error kinds. Matched structurally at the boundary; never
/// derived from substring checks on upstream messages.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed request data (400).
    #[error("{0}")]
    InvalidInput(String),

    /// Upstream model quota/throttle; caller may retry after a delay (429).
    #[error("Rate limited by the model provider. Retry shortly or shorten the transcript. {0}")]
    RateLimited(String),

    /// Upstream model failure, not automatically retryable (500).
    #[error("Dialogue generation failed: {0}")]
    GenerationFailed(String),

    /// Transcoding or speech recognition failure (500).
    #[error("Audio processing failed: {0}")]
    AudioProcessingFailed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::GenerationFailed(_) | ApiError::AudioProcessingFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::warn!(target: "podcastai::gateway", "{}: {}", status, message);
        }
        (
            status,
            Json(serde_json::json!({ "success": false, "error": message })),
        )
            .into_response()
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited(detail) => ApiError::RateLimited(detail),
            other => ApiError::GenerationFailed(other.to_string()),
        }
    }
}

impl From<VoiceError> for ApiError {
    fn from(err: VoiceError) -> Self {
        ApiError::AudioProcessingFailed(err.to_string())
    }
}
