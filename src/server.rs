//! HTTP boundary: upload endpoint, language list, health check.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, info};

use crate::config::ProviderKind;
use crate::error::ApiError;
use crate::languages::{Language, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};
use crate::provider::{normalize_words, SttProvider};
use crate::transcript::format::{format_duration, format_timestamp};
use crate::transcript::validate::{validate_audio_file, MAX_UPLOAD_BYTES};
use crate::transcript::Transcript;

/// Transport-level body cap: the validation ceiling plus multipart
/// framing slack, so the validator produces the user-facing size error.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES as usize + 16 * 1024 * 1024;

/// Shared state for the upload handlers
#[derive(Clone)]
pub struct AppState {
    /// None when the deployment is missing its provider API key
    pub provider: Option<Arc<SttProvider>>,
    pub provider_kind: ProviderKind,
}

/// Build the service router with CORS and upload size limits applied.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/transcribe", post(transcribe))
        .route("/api/languages", get(languages))
        .route("/health", get(health))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(RequestBodyLimitLayer::new(UPLOAD_BODY_LIMIT))
}

struct UploadedFile {
    name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Accept a multipart audio upload, proxy it to the configured STT
/// provider, and return the assembled transcript.
async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Transcript>, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut language = DEFAULT_LANGUAGE.to_string();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();
                file = Some(UploadedFile {
                    name: file_name,
                    content_type,
                    bytes,
                });
            }
            Some("language") => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    language = value;
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or(ApiError::MissingFile)?;
    validate_audio_file(&file.name, file.bytes.len() as u64)?;

    let provider = state.provider.as_ref().ok_or(ApiError::MissingApiKey)?;

    info!(
        "Transcribing {} ({} bytes, language={}) via {}",
        file.name,
        file.bytes.len(),
        language,
        provider.name()
    );

    let raw = provider
        .transcribe(
            file.bytes,
            &file.name,
            file.content_type.as_deref(),
            &language,
        )
        .await?;

    let words = normalize_words(raw.words);
    let language = raw.language.unwrap_or(language);
    let transcript =
        Transcript::from_words(Some(file.name), raw.text, language, raw.duration, words);

    for segment in &transcript.segments {
        debug!(
            "[{} - {}] speaker {}: {} chars",
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            segment.speaker,
            segment.text.len()
        );
    }

    info!(
        "Transcript {} ready: {} words, {} segments, {} speaker(s), {} of audio",
        transcript.id,
        transcript.words.len(),
        transcript.segments.len(),
        transcript.speakers,
        format_duration(transcript.duration)
    );

    Ok(Json(transcript))
}

/// The language list offered by the upload form.
async fn languages() -> Json<&'static [Language]> {
    Json(SUPPORTED_LANGUAGES)
}

/// Liveness endpoint.
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "provider": state.provider_kind,
        "configured": state.provider.is_some(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
