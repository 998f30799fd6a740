//! OpenRouter dialogue bridge: the chat-completions client behind the
//! [`DialogueModel`] seam.
//!
//! API key comes from the injected [`GeneratorConfig`], never from ambient
//! state. Rate limits are detected from the upstream HTTP status so the
//! gateway can surface a retryable 429 distinct from generic failure.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{GenerationParams, GeneratorConfig};
use crate::error::{LlmError, LlmResult};
use crate::prompts::DIALOGUE_SYSTEM;

pub(crate) const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
pub(crate) const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";

/// Script returned when the model answers with no usable completion.
pub const EMPTY_COMPLETION_SCRIPT: &str = "Failed to generate content";

/// External generative model: one user prompt in, free-form script text out.
#[async_trait]
pub trait DialogueModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> LlmResult<String>;
}

// OpenAI-compatible request/response for OpenRouter
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// OpenRouter-backed [`DialogueModel`]. Owns its HTTP client; share it
/// behind an `Arc`.
pub struct OpenRouterBridge {
    api_key: Option<String>,
    api_base: String,
    model: String,
    params: GenerationParams,
    client: reqwest::Client,
}

impl OpenRouterBridge {
    /// Build from the injected config (key, model, and sampling come from it).
    pub fn new(config: &GeneratorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            params: config.params.clone(),
            client,
        }
    }

    fn chat_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: DIALOGUE_SYSTEM.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: Some(self.params.temperature),
            top_p: Some(self.params.top_p),
            top_k: Some(self.params.top_k),
            max_tokens: Some(self.params.max_tokens),
        }
    }
}

/// First choice's trimmed content, or the fallback sentinel when the model
/// returned nothing usable.
fn completion_text(parsed: ChatResponse) -> String {
    let text = parsed
        .choices
        .first()
        .map(|c| c.message.content.trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        tracing::warn!(
            target: "podcastai::llm",
            "model returned an empty completion; using fallback script"
        );
        return EMPTY_COMPLETION_SCRIPT.to_string();
    }
    text
}

#[async_trait]
impl DialogueModel for OpenRouterBridge {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmError::Config(
                "OPENROUTER_API_KEY (or PODCASTAI_LLM_API_KEY) is not set".to_string(),
            )
        })?;

        let url = format!("{}/chat/completions", self.api_base);
        let body = self.chat_request(prompt);

        let res = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("HTTP-Referer", "https://podcastai.local")
            .header("X-Title", "PodcastAI-Dialogue-Bridge")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(format!("OpenRouter request failed: {}", e)))?;

        if res.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let detail = res.text().await.unwrap_or_default();
            return Err(LlmError::RateLimited(detail));
        }
        if !res.status().is_success() {
            let status = res.status();
            let detail = res.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!(
                "OpenRouter API error {}: {}",
                status, detail
            )));
        }

        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| LlmError::Api(format!("OpenRouter response parse failed: {}", e)))?;

        Ok(completion_text(parsed))
    }
}
