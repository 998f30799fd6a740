//! Error types for the dialogue generation layer.

use thiserror::Error;

/// Result type alias for model-client operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors surfaced by the external generative-model client.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Model rate limited: {0}")]
    RateLimited(String),

    #[error("Model API error: {0}")]
    Api(String),

    #[error("Model request failed: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
