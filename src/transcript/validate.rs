//! Upload validation: audio extension allow-list and size ceiling.
//!
//! The browser runs the same gate before uploading; this server-side copy
//! is the authoritative one.

use thiserror::Error;

/// Maximum accepted upload size (500 MB)
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Accepted audio file extensions, lowercase, without the leading dot
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "flac", "ogg", "webm", "mp4"];

/// Rejection reasons for an uploaded file
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unsupported file format. Please use: {allowed}")]
    UnsupportedFormat {
        /// Extension actually seen, lowercase ("" when the name has no dot)
        extension: String,
        /// Formatted allow-list for the user-facing message
        allowed: String,
    },

    #[error("File size exceeds 500MB limit. Your file is {size_mb:.2}MB")]
    FileTooLarge { size_mb: f64 },
}

fn allowed_list() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check a candidate upload against the extension allow-list and the
/// size ceiling. The extension is the substring after the last `.` in
/// the file name, compared case-insensitively.
pub fn validate_audio_file(file_name: &str, size: u64) -> Result<(), ValidationError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedFormat {
            extension,
            allowed: allowed_list(),
        });
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge {
            size_mb: size as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(())
}
