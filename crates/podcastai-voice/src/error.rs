//! Error types for the audio acquisition layer.

use thiserror::Error;

/// Result type alias for voice operations.
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors from decoding, normalizing, or transcribing uploaded audio.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Audio decode error: {0}")]
    Decode(String),

    #[error("STT error: {0}")]
    Stt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
