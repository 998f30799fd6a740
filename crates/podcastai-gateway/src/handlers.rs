//! Request orchestrators for the two generation endpoints.
//!
//! Both paths converge on `synthesize_dialogue`: bound the topic text, prompt
//! the model, parse and limit the script, shape the wire response. Handlers
//! validate input and acquire it; they hold no state of their own.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Request, State};
use axum::http::header;
use axum::{Form, Json, RequestExt};
use serde::Deserialize;

use podcastai_core::prompts::dialogue_user_prompt;
use podcastai_core::{limit_segments, parse_script, truncate_chars, PodcastResponse};
use podcastai_voice::decode_upload;

use crate::error::ApiError;
use crate::AppState;

/// GET /health — liveness probe.
pub async fn health() -> &'static str {
    "OK"
}

#[derive(Deserialize)]
struct TranscriptForm {
    #[serde(default)]
    transcript: Option<String>,
}

/// POST /api/generate-from-transcript — form field `transcript`, urlencoded
/// or multipart (the browser frontend submits `FormData`).
pub async fn generate_from_transcript(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<PodcastResponse>, ApiError> {
    let transcript = transcript_field(req).await?;
    let transcript = transcript.trim();
    if transcript.is_empty() {
        return Err(ApiError::InvalidInput("transcript is required".into()));
    }
    synthesize_dialogue(&state, transcript).await
}

/// POST /api/generate-podcast — multipart file field `audio`. Strict policy:
/// the part must carry an `audio/*` content type or it is rejected before any
/// transcoding happens.
pub async fn generate_podcast(
    State(state): State<AppState>,
    mut parts: Multipart,
) -> Result<Json<PodcastResponse>, ApiError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = parts
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(format!("invalid multipart form: {e}")))?
    {
        if field.name() != Some("audio") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::InvalidInput("audio upload needs a filename".into()))?;
        match field.content_type() {
            Some(ct) if ct.starts_with("audio/") => {}
            other => {
                return Err(ApiError::InvalidInput(format!(
                    "expected an audio/* upload, got {}",
                    other.unwrap_or("no content type")
                )));
            }
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidInput(format!("audio upload unreadable: {e}")))?;
        upload = Some((file_name, data));
        break;
    }
    let (file_name, data) =
        upload.ok_or_else(|| ApiError::InvalidInput("audio file is required".into()))?;
    if data.is_empty() {
        return Err(ApiError::InvalidInput("audio upload is empty".into()));
    }

    // Decode and recognition are blocking; keep them off the async executor.
    let stt = Arc::clone(&state.stt);
    let transcript = tokio::task::spawn_blocking(move || -> Result<String, ApiError> {
        let clip = decode_upload(&data, &file_name)?;
        tracing::info!(
            target: "podcastai::voice",
            "decoded {:.1}s of audio from {}",
            clip.duration_secs(),
            file_name
        );
        Ok(stt.transcribe(&clip)?)
    })
    .await
    .map_err(|e| ApiError::AudioProcessingFailed(format!("audio task failed: {e}")))??;

    let transcript = transcript.trim();
    if transcript.is_empty() {
        return Err(ApiError::AudioProcessingFailed(
            "recognizer produced an empty transcript".into(),
        ));
    }
    synthesize_dialogue(&state, transcript).await
}

/// Pull the `transcript` field out of either supported form encoding.
async fn transcript_field(req: Request) -> Result<String, ApiError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let mut parts = req
            .extract::<Multipart, _>()
            .await
            .map_err(|e| ApiError::InvalidInput(format!("invalid multipart form: {e}")))?;
        while let Some(field) = parts
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidInput(format!("invalid multipart form: {e}")))?
        {
            if field.name() == Some("transcript") {
                return field
                    .text()
                    .await
                    .map_err(|e| ApiError::InvalidInput(format!("transcript unreadable: {e}")));
            }
        }
        Err(ApiError::InvalidInput("transcript is required".into()))
    } else {
        let Form(form) = req
            .extract::<Form<TranscriptForm>, _>()
            .await
            .map_err(|e| ApiError::InvalidInput(format!("invalid form body: {e}")))?;
        form.transcript
            .ok_or_else(|| ApiError::InvalidInput("transcript is required".into()))
    }
}

/// Shared tail of both endpoints: bounded topic → prompt → model → parse →
/// limit → response.
async fn synthesize_dialogue(
    state: &AppState,
    topic: &str,
) -> Result<Json<PodcastResponse>, ApiError> {
    let bounded = truncate_chars(topic, state.config.max_transcript_chars);
    let prompt = dialogue_user_prompt(&bounded);

    let script = state.model.generate(&prompt).await?;
    let segments = limit_segments(
        &parse_script(&script),
        Some(state.config.max_segments),
        state.config.max_segment_chars,
    );
    tracing::info!(
        target: "podcastai::gateway",
        "dialogue synthesized: {} script chars, {} segments",
        script.chars().count(),
        segments.len()
    );
    Ok(Json(PodcastResponse {
        success: true,
        script,
        segments,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_app;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use std::sync::Mutex;
    use tower::ServiceExt;

    use podcastai_core::{DialogueModel, GeneratorConfig, LlmError, LlmResult};
    use podcastai_voice::{PlaceholderStt, SttBackend};

    const SCRIPT: &str = "Host A: Welcome to the show.\nHost B: Glad to be here!";

    struct ScriptedModel(&'static str);

    #[async_trait]
    impl DialogueModel for ScriptedModel {
        async fn generate(&self, _prompt: &str) -> LlmResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct CapturingModel {
        seen: Mutex<Option<String>>,
    }

    #[async_trait]
    impl DialogueModel for CapturingModel {
        async fn generate(&self, prompt: &str) -> LlmResult<String> {
            *self.seen.lock().unwrap() = Some(prompt.to_string());
            Ok(SCRIPT.to_string())
        }
    }

    struct FailingModel(fn() -> LlmError);

    #[async_trait]
    impl DialogueModel for FailingModel {
        async fn generate(&self, _prompt: &str) -> LlmResult<String> {
            Err((self.0)())
        }
    }

    fn app_with(model: Arc<dyn DialogueModel>, stt: Arc<dyn SttBackend>) -> Router {
        build_app(AppState {
            config: Arc::new(GeneratorConfig::default()),
            model,
            stt,
        })
    }

    fn scripted_app(script: &'static str) -> Router {
        app_with(Arc::new(ScriptedModel(script)), Arc::new(PlaceholderStt::new()))
    }

    fn transcript_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate-from-transcript")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const BOUNDARY: &str = "podcastai-test-boundary";

    fn multipart_text(name: &str, value: &str) -> Vec<u8> {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n--{BOUNDARY}--\r\n"
        )
        .into_bytes()
    }

    fn multipart_file(name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn wav_bytes() -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..1600 {
                let t = i as f32 / 16_000.0;
                let v = (t * 440.0 * 2.0 * std::f32::consts::PI).sin();
                writer.write_sample((v * 12_000.0) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let res = scripted_app(SCRIPT)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn transcript_form_produces_segmented_response() {
        let res = scripted_app(SCRIPT)
            .oneshot(transcript_request("transcript=rust+async+runtimes"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["script"], SCRIPT);
        assert_eq!(json["segments"][0]["speaker"], "Host A");
        assert_eq!(json["segments"][0]["text"], "Welcome to the show.");
        assert_eq!(json["segments"][1]["speaker"], "Host B");
    }

    #[tokio::test]
    async fn transcript_accepts_multipart_form_data() {
        let res = scripted_app(SCRIPT)
            .oneshot(multipart_request(
                "/api/generate-from-transcript",
                multipart_text("transcript", "container orchestration"),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(response_json(res).await["success"], true);
    }

    #[tokio::test]
    async fn empty_transcript_is_a_client_error() {
        for body in ["transcript=", "transcript=+++", "other=x"] {
            let res = scripted_app(SCRIPT)
                .oneshot(transcript_request(body))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let json = response_json(res).await;
            assert_eq!(json["success"], false);
            assert!(json["error"].as_str().unwrap().contains("transcript"));
        }
    }

    #[tokio::test]
    async fn transcript_is_bounded_before_prompting() {
        let model = Arc::new(CapturingModel {
            seen: Mutex::new(None),
        });
        let app = app_with(model.clone(), Arc::new(PlaceholderStt::new()));
        let long = "a".repeat(4000);
        let res = app
            .oneshot(transcript_request(&format!("transcript={long}")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let prompt = model.seen.lock().unwrap().clone().unwrap();
        assert!(prompt.contains(&"a".repeat(2500)));
        assert!(!prompt.contains(&"a".repeat(2501)));
    }

    #[tokio::test]
    async fn rate_limited_model_maps_to_429() {
        let app = app_with(
            Arc::new(FailingModel(|| LlmError::RateLimited("quota".into()))),
            Arc::new(PlaceholderStt::new()),
        );
        let res = app
            .oneshot(transcript_request("transcript=hello"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response_json(res).await["success"], false);
    }

    #[tokio::test]
    async fn model_failure_maps_to_500() {
        let app = app_with(
            Arc::new(FailingModel(|| LlmError::Api("upstream 502".into()))),
            Arc::new(PlaceholderStt::new()),
        );
        let res = app
            .oneshot(transcript_request("transcript=hello"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn twelve_segment_script_is_limited_to_eight() {
        let script: &'static str = Box::leak(
            (0..12)
                .map(|i| format!("Host {}: line {i}.", if i % 2 == 0 { "A" } else { "B" }))
                .collect::<Vec<_>>()
                .join("\n")
                .into_boxed_str(),
        );
        let res = scripted_app(script)
            .oneshot(transcript_request("transcript=long+show"))
            .await
            .unwrap();
        let json = response_json(res).await;
        let segments = json["segments"].as_array().unwrap();
        assert_eq!(segments.len(), 8);
        assert_eq!(segments[0]["text"], "line 0.");
        assert_eq!(segments[7]["text"], "line 7.");
    }

    #[tokio::test]
    async fn audio_upload_is_transcribed_and_synthesized() {
        let app = app_with(
            Arc::new(ScriptedModel(SCRIPT)),
            Arc::new(PlaceholderStt::with_response("talk about databases")),
        );
        let res = app
            .oneshot(multipart_request(
                "/api/generate-podcast",
                multipart_file("audio", "note.wav", "audio/wav", &wav_bytes()),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["segments"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn non_audio_content_type_is_rejected_before_transcoding() {
        // Garbage payload: had transcoding been attempted this would be a 500.
        let res = scripted_app(SCRIPT)
            .oneshot(multipart_request(
                "/api/generate-podcast",
                multipart_file("audio", "note.txt", "text/plain", b"not audio"),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = response_json(res).await;
        assert!(json["error"].as_str().unwrap().contains("audio/*"));
    }

    #[tokio::test]
    async fn missing_audio_field_is_a_client_error() {
        let res = scripted_app(SCRIPT)
            .oneshot(multipart_request(
                "/api/generate-podcast",
                multipart_text("something_else", "x"),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn corrupt_audio_maps_to_processing_failure() {
        let res = scripted_app(SCRIPT)
            .oneshot(multipart_request(
                "/api/generate-podcast",
                multipart_file("audio", "note.wav", "audio/wav", b"truncated garbage"),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(res).await;
        assert!(json["error"].as_str().unwrap().contains("Audio processing"));
    }

    #[tokio::test]
    async fn empty_recognized_transcript_maps_to_processing_failure() {
        let app = app_with(
            Arc::new(ScriptedModel(SCRIPT)),
            Arc::new(PlaceholderStt::with_response("   ")),
        );
        let res = app
            .oneshot(multipart_request(
                "/api/generate-podcast",
                multipart_file("audio", "note.wav", "audio/wav", &wav_bytes()),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
