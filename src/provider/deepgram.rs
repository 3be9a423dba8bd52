//! Deepgram STT client.
//!
//! Sends the raw audio bytes to the Deepgram `/v1/listen` endpoint with
//! diarization and smart formatting enabled, then flattens the
//! channels/alternatives nesting into the normalized transcription shape.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{truncate_body, ProviderError, ProviderWord, RawTranscription};

const PROVIDER: &str = "deepgram";

const DEEPGRAM_BASE_URL: &str = "https://api.deepgram.com";

/// Deepgram transcription model
const STT_MODEL: &str = "nova-2";

/// Content type assumed when the upload did not declare one
const FALLBACK_CONTENT_TYPE: &str = "audio/wav";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct DeepgramResponse {
    metadata: DeepgramMetadata,
    results: DeepgramResults,
}

#[derive(Debug, Deserialize)]
struct DeepgramMetadata {
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(Debug, Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(Debug, Deserialize)]
struct DeepgramAlternative {
    transcript: String,
    #[serde(default)]
    words: Vec<DeepgramWord>,
}

#[derive(Debug, Deserialize)]
struct DeepgramWord {
    word: String,
    punctuated_word: Option<String>,
    start: f64,
    end: f64,
    speaker: Option<u32>,
}

impl From<DeepgramWord> for ProviderWord {
    fn from(w: DeepgramWord) -> Self {
        ProviderWord {
            word: w.word,
            punctuated_word: w.punctuated_word,
            start: w.start,
            end: w.end,
            speaker: w.speaker,
        }
    }
}

pub struct DeepgramClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DeepgramClient {
    pub fn new(api_key: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, DEEPGRAM_BASE_URL)
    }

    /// Create a client against a non-default endpoint (tests).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingKey);
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Transcribe an uploaded audio file with speaker diarization.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        content_type: Option<&str>,
        language: &str,
    ) -> Result<RawTranscription, ProviderError> {
        let url = format!("{}/v1/listen", self.base_url);
        let content_type = content_type.unwrap_or(FALLBACK_CONTENT_TYPE);

        debug!(
            "Deepgram transcription: {} bytes, content_type={}, language={}",
            audio.len(),
            content_type,
            language
        );

        let response = self
            .client
            .post(&url)
            .query(&[
                ("model", STT_MODEL),
                ("diarize", "true"),
                ("punctuate", "true"),
                ("smart_format", "true"),
                ("language", language),
            ])
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, content_type)
            .body(audio)
            .send()
            .await
            .map_err(|e| ProviderError::Request {
                provider: PROVIDER,
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                provider: PROVIDER,
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let parsed: DeepgramResponse =
            response.json().await.map_err(|e| ProviderError::Parse {
                provider: PROVIDER,
                source: e,
            })?;

        let duration = parsed.metadata.duration;
        let alternative = parsed
            .results
            .channels
            .into_iter()
            .next()
            .and_then(|channel| channel.alternatives.into_iter().next())
            .ok_or(ProviderError::MissingTranscript { provider: PROVIDER })?;

        info!(
            "Deepgram transcription complete: {} chars, {} words, {:.1}s audio",
            alternative.transcript.len(),
            alternative.words.len(),
            duration
        );

        Ok(RawTranscription {
            text: alternative.transcript,
            language: None,
            duration,
            words: alternative.words.into_iter().map(Into::into).collect(),
        })
    }
}
