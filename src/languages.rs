//! Languages accepted for transcription requests.

use serde::Serialize;

/// Language requested when the upload does not specify one
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Languages offered in the upload form, in display order.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "it", name: "Italian" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "nl", name: "Dutch" },
    Language { code: "ru", name: "Russian" },
    Language { code: "zh", name: "Chinese" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ko", name: "Korean" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "tr", name: "Turkish" },
    Language { code: "pl", name: "Polish" },
    Language { code: "sv", name: "Swedish" },
    Language { code: "da", name: "Danish" },
    Language { code: "fi", name: "Finnish" },
    Language { code: "no", name: "Norwegian" },
    Language { code: "cs", name: "Czech" },
    Language { code: "el", name: "Greek" },
    Language { code: "he", name: "Hebrew" },
    Language { code: "th", name: "Thai" },
    Language { code: "vi", name: "Vietnamese" },
    Language { code: "id", name: "Indonesian" },
];
