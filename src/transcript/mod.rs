//! Transcript data model and pure transformations.
//!
//! A transcription is a flat ordered sequence of timestamped words; this
//! module groups them into contiguous per-speaker segments and assembles
//! the complete transcript record returned to the caller.

pub mod format;
pub mod segment;
pub mod validate;

pub use segment::build_segments;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// One recognized token with word-level timestamps.
///
/// Speaker defaulting (absent means speaker 0) and punctuated-text
/// resolution happen at the provider normalization boundary, so every
/// word here carries a concrete speaker id and its display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Display text (the provider-punctuated form when one was supplied)
    #[serde(rename = "word")]
    pub text: String,
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
    /// Speaker id assigned by diarization
    pub speaker: u32,
}

/// A maximal run of consecutive words sharing one speaker id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSegment {
    pub speaker: u32,
    /// Words space-joined and trimmed
    pub text: String,
    /// Start of the segment's first word, in seconds
    pub start: f64,
    /// End of the segment's last word, in seconds
    pub end: f64,
}

/// A complete transcription record.
///
/// Created once per successful transcription call and never mutated;
/// the caller stores it verbatim in its history list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Full transcript text as returned by the provider
    pub text: String,
    pub language: String,
    /// Total audio duration in seconds
    pub duration: f64,
    pub words: Vec<Word>,
    pub segments: Vec<SpeakerSegment>,
    /// Count of distinct speaker ids observed in the word list
    pub speakers: usize,
}

impl Transcript {
    /// Assemble a transcript from a normalized word sequence.
    pub fn from_words(
        file_name: Option<String>,
        text: String,
        language: String,
        duration: f64,
        words: Vec<Word>,
    ) -> Self {
        let segments = build_segments(&words);
        let speakers = words
            .iter()
            .map(|w| w.speaker)
            .collect::<HashSet<_>>()
            .len();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            file_name,
            text,
            language,
            duration,
            words,
            segments,
            speakers,
        }
    }

    /// Render the transcript as plain text with speaker labels.
    ///
    /// Segments become `Speaker N: ...` blocks separated by blank lines;
    /// speakers are numbered from 1 for display. Falls back to the flat
    /// text when there are no segments.
    pub fn speaker_labeled_text(&self) -> String {
        if self.segments.is_empty() {
            return self.text.clone();
        }

        self.segments
            .iter()
            .map(|s| format!("Speaker {}: {}", s.speaker + 1, s.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
