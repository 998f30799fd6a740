//! Generator configuration loaded from `.env`.
//!
//! Built once at process start and injected into the gateway state; nothing
//! below this layer reads the environment after boot.

use crate::openrouter::{DEFAULT_MODEL, OPENROUTER_API_BASE};

/// Sampling parameters forwarded with every chat-completions request.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            top_p: 0.95,
            top_k: 40,
            max_tokens: 5500,
        }
    }
}

/// Dialogue generator configuration.
///
/// | Env | Default | Description |
/// |-----|---------|-------------|
/// | OPENROUTER_API_KEY / PODCASTAI_LLM_API_KEY | unset | Bearer key for the model API. |
/// | PODCASTAI_LLM_API_URL | https://openrouter.ai/api/v1 | OpenAI-compatible API base. |
/// | PODCASTAI_LLM_MODEL | meta-llama/llama-3.3-70b-instruct | Chat model id. |
/// | PODCASTAI_LLM_TEMPERATURE | 0.5 | Sampling temperature (0.0–2.0). |
/// | PODCASTAI_LLM_TOP_P | 0.95 | Nucleus sampling mass (0.0–1.0). |
/// | PODCASTAI_LLM_TOP_K | 40 | Top-k sampling cutoff. |
/// | PODCASTAI_LLM_MAX_TOKENS | 5500 | Output token cap. |
/// | PODCASTAI_MAX_TRANSCRIPT_CHARS | 2500 | Transcript bound before prompting. |
/// | PODCASTAI_MAX_SEGMENTS | 8 | Segment count cap per response. |
/// | PODCASTAI_MAX_SEGMENT_CHARS | 500 | Utterance soft-truncation window. |
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Bearer key; `None` makes every generation fail with a config error.
    pub api_key: Option<String>,
    /// API base URL without trailing slash.
    pub api_base: String,
    /// Chat model id sent with each request.
    pub model: String,
    /// Sampling parameters.
    pub params: GenerationParams,
    /// Transcript character bound applied before prompt embedding.
    pub max_transcript_chars: usize,
    /// Maximum segments kept per response.
    pub max_segments: usize,
    /// Utterance character cap for soft truncation.
    pub max_segment_chars: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: OPENROUTER_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            params: GenerationParams::default(),
            max_transcript_chars: 2500,
            max_segments: 8,
            max_segment_chars: 500,
        }
    }
}

impl GeneratorConfig {
    /// Load from environment. Unset or invalid values fall back to the
    /// defaults in the table above.
    pub fn from_env() -> Self {
        let defaults = GenerationParams::default();
        Self {
            api_key: env_opt_string("OPENROUTER_API_KEY")
                .or_else(|| env_opt_string("PODCASTAI_LLM_API_KEY")),
            api_base: env_opt_string("PODCASTAI_LLM_API_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| OPENROUTER_API_BASE.to_string()),
            model: env_opt_string("PODCASTAI_LLM_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            params: GenerationParams {
                temperature: env_f32("PODCASTAI_LLM_TEMPERATURE", defaults.temperature)
                    .clamp(0.0, 2.0),
                top_p: env_f32("PODCASTAI_LLM_TOP_P", defaults.top_p).clamp(0.0, 1.0),
                top_k: env_u32("PODCASTAI_LLM_TOP_K", defaults.top_k),
                max_tokens: env_u32("PODCASTAI_LLM_MAX_TOKENS", defaults.max_tokens),
            },
            max_transcript_chars: env_usize("PODCASTAI_MAX_TRANSCRIPT_CHARS", 2500),
            max_segments: env_usize("PODCASTAI_MAX_SEGMENTS", 8),
            max_segment_chars: env_usize("PODCASTAI_MAX_SEGMENT_CHARS", 500),
        }
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_f32(name: &str, default: f32) -> f32 {
    match std::env::var(name) {
        Ok(v) => v.trim().parse::<f32>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_u32(name: &str, default: u32) -> u32 {
    match std::env::var(name) {
        Ok(v) => v.trim().parse::<u32>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(v) => v.trim().parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}
