//! Speech-to-text provider adapters.
//!
//! Each provider speaks its own JSON schema; the adapters here translate
//! both into one normalized word-sequence shape so a single grouping pass
//! serves every deployment. Provider calls are single-attempt: a failed
//! transcription is terminal for that request and the user resubmits.

pub mod cartesia;
pub mod deepgram;

pub use cartesia::CartesiaClient;
pub use deepgram::DeepgramClient;

use serde::Deserialize;
use thiserror::Error;

use crate::config::{Config, ProviderKind};
use crate::transcript::Word;

/// Longest upstream error body carried into logs and error records
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors from the provider boundary
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API key is required")]
    MissingKey,

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send request to {provider}: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Transcription failed: {provider} returned {status}")]
    Upstream {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {provider} response: {source}")]
    Parse {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} response contained no transcript")]
    MissingTranscript { provider: &'static str },
}

/// One raw provider token, before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderWord {
    pub word: String,
    pub punctuated_word: Option<String>,
    pub start: f64,
    pub end: f64,
    pub speaker: Option<u32>,
}

/// Normalized provider output: the fixed response shape the rest of the
/// service consumes, whichever provider produced it.
#[derive(Debug, Clone)]
pub struct RawTranscription {
    pub text: String,
    /// Language reported by the provider, when it reports one
    pub language: Option<String>,
    /// Total audio duration in seconds
    pub duration: f64,
    pub words: Vec<ProviderWord>,
}

/// Collapse provider optionality into concrete words: the punctuated form
/// wins over the raw token, and an absent speaker id means speaker 0.
/// This is the only place those defaults are applied.
pub fn normalize_words(words: Vec<ProviderWord>) -> Vec<Word> {
    words
        .into_iter()
        .map(|w| Word {
            text: w.punctuated_word.unwrap_or(w.word),
            start: w.start,
            end: w.end,
            speaker: w.speaker.unwrap_or(0),
        })
        .collect()
}

/// Truncate an upstream error body without splitting a UTF-8 character.
pub(crate) fn truncate_body(body: String) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body
    } else {
        body.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}

/// The configured STT provider.
pub enum SttProvider {
    Cartesia(CartesiaClient),
    Deepgram(DeepgramClient),
}

impl SttProvider {
    /// Build the provider selected by the configuration.
    ///
    /// Returns `Ok(None)` when the matching API key is not configured;
    /// the server reports that as a configuration error at request time.
    pub fn from_config(config: &Config) -> Result<Option<Self>, ProviderError> {
        match config.provider {
            ProviderKind::Cartesia => match config.api_key() {
                Some(key) => Ok(Some(Self::Cartesia(CartesiaClient::new(key)?))),
                None => Ok(None),
            },
            ProviderKind::Deepgram => match config.api_key() {
                Some(key) => Ok(Some(Self::Deepgram(DeepgramClient::new(key)?))),
                None => Ok(None),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cartesia(_) => "cartesia",
            Self::Deepgram(_) => "deepgram",
        }
    }

    /// Send audio to the provider and normalize its response.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        content_type: Option<&str>,
        language: &str,
    ) -> Result<RawTranscription, ProviderError> {
        match self {
            Self::Cartesia(client) => client.transcribe(audio, file_name, language).await,
            Self::Deepgram(client) => client.transcribe(audio, content_type, language).await,
        }
    }
}
