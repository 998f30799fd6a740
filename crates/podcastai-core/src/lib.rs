//! podcastai-core: dialogue synthesis library (prompting, model bridge,
//! script segmentation, response shaping).
//!
//! The gateway holds the model as `Arc<dyn DialogueModel>`; only `main`
//! constructs the real OpenRouter bridge, so tests swap in scripted stubs.

mod config;
mod error;
mod limiter;
mod openrouter;
mod script;
mod segment;
pub mod prompts;

// Configuration (constructed in main, injected everywhere else)
pub use config::{GenerationParams, GeneratorConfig};

// Errors
pub use error::{LlmError, LlmResult};

// Segmentation pipeline
pub use limiter::{
    limit_segments, truncate_at_sentence, truncate_chars, DEFAULT_MAX_SEGMENTS,
    DEFAULT_MAX_SEGMENT_CHARS,
};
pub use script::parse_script;
pub use segment::{PodcastResponse, Segment};

// OpenRouter dialogue bridge (model seam + real client)
pub use openrouter::{DialogueModel, OpenRouterBridge, EMPTY_COMPLETION_SCRIPT};
