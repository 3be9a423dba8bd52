//! Cartesia STT client.
//!
//! Uploads the audio file as multipart form data to the Cartesia `/stt`
//! endpoint with word-level timestamp granularity. Cartesia does not
//! diarize, so every word normalizes to speaker 0.

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{truncate_body, ProviderError, ProviderWord, RawTranscription};

const PROVIDER: &str = "cartesia";

const CARTESIA_BASE_URL: &str = "https://api.cartesia.ai";

/// API version header value required by Cartesia
const CARTESIA_VERSION: &str = "2025-04-16";

/// Cartesia transcription model
const STT_MODEL: &str = "ink-whisper";

/// Timeout covering upload plus transcription of long audio
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct CartesiaResponse {
    text: String,
    language: Option<String>,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    words: Vec<CartesiaWord>,
}

#[derive(Debug, Deserialize)]
struct CartesiaWord {
    word: String,
    start: f64,
    end: f64,
}

impl From<CartesiaResponse> for RawTranscription {
    fn from(response: CartesiaResponse) -> Self {
        RawTranscription {
            text: response.text,
            language: response.language,
            duration: response.duration,
            words: response
                .words
                .into_iter()
                .map(|w| ProviderWord {
                    word: w.word,
                    punctuated_word: None,
                    start: w.start,
                    end: w.end,
                    speaker: None,
                })
                .collect(),
        }
    }
}

pub struct CartesiaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CartesiaClient {
    pub fn new(api_key: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, CARTESIA_BASE_URL)
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

    /// Transcribe an uploaded audio file.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        language: &str,
    ) -> Result<RawTranscription, ProviderError> {
        let url = format!("{}/stt", self.base_url);

        debug!(
            "Cartesia transcription: {} bytes, file={}, language={}",
            audio.len(),
            file_name,
            language
        );

        let file_part = reqwest::multipart::Part::bytes(audio).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", STT_MODEL)
            .text("language", language.to_string())
            .text("timestamp_granularities[]", "word");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Cartesia-Version", CARTESIA_VERSION)
            .multipart(form)
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

        let parsed: CartesiaResponse =
            response.json().await.map_err(|e| ProviderError::Parse {
                provider: PROVIDER,
                source: e,
            })?;

        info!(
            "Cartesia transcription complete: {} chars, {} words, {:.1}s audio",
            parsed.text.len(),
            parsed.words.len(),
            parsed.duration
        );

        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_api_key() {
        assert!(matches!(
            CartesiaClient::new(""),
            Err(ProviderError::MissingKey)
        ));
        assert!(matches!(
            CartesiaClient::new("   "),
            Err(ProviderError::MissingKey)
        ));
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let client = CartesiaClient::with_base_url("key", "http://localhost:9000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_parse_response_with_words() {
        let json = r#"{
            "text": "Hello world.",
            "language": "en",
            "duration": 1.2,
            "words": [
                {"word": "Hello", "start": 0.0, "end": 0.6},
                {"word": "world.", "start": 0.6, "end": 1.2}
            ]
        }"#;
        let parsed: CartesiaResponse = serde_json::from_str(json).unwrap();
        let raw: RawTranscription = parsed.into();

        assert_eq!(raw.text, "Hello world.");
        assert_eq!(raw.language.as_deref(), Some("en"));
        assert_eq!(raw.duration, 1.2);
        assert_eq!(raw.words.len(), 2);
        // Cartesia reports no diarization or punctuated form
        assert_eq!(raw.words[0].speaker, None);
        assert_eq!(raw.words[0].punctuated_word, None);
        assert_eq!(raw.words[1].start, 0.6);
    }

    #[test]
    fn test_parse_response_without_words() {
        // Word timestamps are optional in the provider response
        let json = r#"{"text": "Hello.", "language": "en", "duration": 0.8}"#;
        let parsed: CartesiaResponse = serde_json::from_str(json).unwrap();
        let raw: RawTranscription = parsed.into();

        assert_eq!(raw.text, "Hello.");
        assert!(raw.words.is_empty());
    }
}
