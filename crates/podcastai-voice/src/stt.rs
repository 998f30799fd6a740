//! Speech-to-text: convert a normalized [`AudioClip`] into transcript text.
//!
//! Implement [`SttBackend`] for local Whisper (feature `whisper`) or keep the
//! placeholder when no model is available. Backends are blocking; run them
//! under `spawn_blocking` from async contexts.

use std::sync::Arc;

use crate::audio::{AudioClip, STT_SAMPLE_RATE};
use crate::error::{VoiceError, VoiceResult};

/// Backend for converting normalized PCM to text.
pub trait SttBackend: Send + Sync {
    /// Transcribe one clip. PCM is 16 kHz mono f32; an empty string means
    /// nothing was detected.
    fn transcribe(&self, clip: &AudioClip) -> VoiceResult<String>;
}

/// Placeholder STT: returns a fixed string. Keeps the service running
/// without a Whisper model and lets tests script the transcript.
#[derive(Debug, Default)]
pub struct PlaceholderStt {
    /// If set, return this instead of the default message.
    pub response: Option<String>,
}

impl PlaceholderStt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(s: impl Into<String>) -> Self {
        Self {
            response: Some(s.into()),
        }
    }
}

impl SttBackend for PlaceholderStt {
    fn transcribe(&self, clip: &AudioClip) -> VoiceResult<String> {
        if let Some(ref r) = self.response {
            return Ok(r.clone());
        }
        Ok(format!(
            "[STT placeholder: {} samples, {:.1}s; set WHISPER_MODEL_PATH and build with --features whisper]",
            clip.samples.len(),
            clip.duration_secs()
        ))
    }
}

// -----------------------------------------------------------------------------
// Local Whisper STT (optional feature). Requires whisper.cpp/ggml.
// -----------------------------------------------------------------------------
#[cfg(feature = "whisper")]
mod whisper_stt {
    use super::*;
    use std::sync::Mutex;
    use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

    /// Local Whisper STT: loads a ggml quantized model (e.g. ggml-base.en.bin)
    /// and runs inference on-device. Input must be 16 kHz mono f32.
    /// Download models from https://huggingface.co/ggerganov/whisper.cpp.
    pub struct WhisperStt {
        #[allow(dead_code)]
        context: WhisperContext,
        state: Mutex<whisper_rs::WhisperState>,
    }

    impl WhisperStt {
        /// Load the Whisper model from `model_path`.
        pub fn new(model_path: &str) -> VoiceResult<Self> {
            let params = WhisperContextParameters::default();
            let context = WhisperContext::new_with_params(model_path, params)
                .map_err(|e| VoiceError::Stt(format!("Whisper load failed: {}", e)))?;
            let state = context
                .create_state()
                .map_err(|e| VoiceError::Stt(format!("Whisper state init failed: {}", e)))?;
            Ok(Self {
                context,
                state: Mutex::new(state),
            })
        }
    }

    impl SttBackend for WhisperStt {
        fn transcribe(&self, clip: &AudioClip) -> VoiceResult<String> {
            if clip.samples.is_empty() {
                return Ok(String::new());
            }
            if clip.sample_rate != STT_SAMPLE_RATE {
                return Err(VoiceError::Stt(format!(
                    "Whisper expects {} Hz; got {} Hz",
                    STT_SAMPLE_RATE, clip.sample_rate
                )));
            }
            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_print_progress(false);
            params.set_print_realtime(false);
            params.set_no_timestamps(true);
            params.set_language(Some("en"));

            let mut state = self
                .state
                .lock()
                .map_err(|e| VoiceError::Stt(format!("Whisper lock poisoned: {}", e)))?;
            state
                .full(&params, &clip.samples)
                .map_err(|e| VoiceError::Stt(format!("Whisper inference failed: {}", e)))?;
            let text = state
                .as_iter()
                .filter_map(|seg| seg.to_str().ok())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();
            Ok(text)
        }
    }
}

#[cfg(feature = "whisper")]
pub use whisper_stt::WhisperStt;

/// Build the STT backend for the given model path. `Some(path)` loads
/// Whisper (needs the `whisper` feature); `None` or a blank path selects the
/// placeholder. Load failures are returned so the caller decides whether to
/// degrade or abort.
pub fn create_stt(model_path: Option<&str>) -> VoiceResult<Arc<dyn SttBackend>> {
    if let Some(path) = model_path.map(str::trim).filter(|p| !p.is_empty()) {
        #[cfg(feature = "whisper")]
        {
            let backend = whisper_stt::WhisperStt::new(path)?;
            tracing::info!(target: "podcastai::voice", "Whisper model loaded from {}", path);
            return Ok(Arc::new(backend));
        }
        #[cfg(not(feature = "whisper"))]
        {
            return Err(VoiceError::Config(format!(
                "WHISPER_MODEL_PATH is set ({}) but this build lacks the whisper feature",
                path
            )));
        }
    }
    Ok(Arc::new(PlaceholderStt::new()))
}
