//! podcastai-voice: audio input acquisition (upload decode/normalize, STT).
//!
//! [`decode_upload`] turns an uploaded container into mono 16 kHz PCM;
//! [`SttBackend`] turns that into text. Whisper is optional (`--features
//! whisper`); without it the placeholder backend keeps the service running.

mod audio;
mod error;
mod stt;

pub use audio::{decode_file, decode_upload, AudioClip, STT_SAMPLE_RATE};
pub use error::{VoiceError, VoiceResult};
pub use stt::{create_stt, PlaceholderStt, SttBackend};

#[cfg(feature = "whisper")]
pub use stt::WhisperStt;
