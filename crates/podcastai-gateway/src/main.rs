//! podcastai gateway binary: load configuration, construct the OpenRouter
//! bridge and STT backend once, then serve the two generation endpoints.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use podcastai_core::{GeneratorConfig, OpenRouterBridge};
use podcastai_gateway::{build_app, AppState};
use podcastai_voice::{create_stt, PlaceholderStt, SttBackend};

#[tokio::main]
async fn main() {
    // API keys stay in the backend; the frontend never sees them.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[podcastai-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GeneratorConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!(
            target: "podcastai::gateway",
            "No OPENROUTER_API_KEY / PODCASTAI_LLM_API_KEY set; generation requests will fail"
        );
    }
    let model = Arc::new(OpenRouterBridge::new(&config));

    // Whisper when configured and compiled in; otherwise degrade to the
    // placeholder and keep serving.
    let whisper_model_path = std::env::var("WHISPER_MODEL_PATH").ok();
    let stt: Arc<dyn SttBackend> = match create_stt(whisper_model_path.as_deref()) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::warn!(
                target: "podcastai::voice",
                "STT init failed ({}); falling back to placeholder transcripts",
                e
            );
            Arc::new(PlaceholderStt::new())
        }
    };

    let app = build_app(AppState {
        config: Arc::new(config),
        model,
        stt,
    });

    let addr = std::env::var("PODCASTAI_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());
    tracing::info!(target: "podcastai::gateway", "podcastai gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
