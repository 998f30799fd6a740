//! podcastai-gateway: the HTTP surface over the dialogue pipeline.
//!
//! `build_app` wires routes, CORS, and the upload body limit around an
//! injected [`AppState`]; `main` is the only place the real OpenRouter
//! bridge and Whisper backend are constructed.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use podcastai_core::{DialogueModel, GeneratorConfig};
use podcastai_voice::SttBackend;

pub mod error;
pub mod handlers;

/// Uploads above this size are rejected by the framework before the handler
/// runs. Raw phone recordings of a long meeting fit comfortably.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Shared per-process state. Everything is `Arc`ed and immutable after boot;
/// requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GeneratorConfig>,
    pub model: Arc<dyn DialogueModel>,
    pub stt: Arc<dyn SttBackend>,
}

/// Build the router. CORS admits the development frontend origins only; the
/// audio route carries a raised body limit for uploads.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &axum::http::HeaderValue, _| {
                let s = origin.to_str().unwrap_or("");
                s == "http://localhost:3000" || s == "http://127.0.0.1:3000"
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/generate-from-transcript",
            post(handlers::generate_from_transcript),
        )
        .route(
            "/api/generate-podcast",
            post(handlers::generate_podcast).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
        .layer(cors)
}
