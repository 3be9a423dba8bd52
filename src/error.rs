//! Request-level error handling.
//!
//! Every failure surfaces to the caller as a two-field record:
//! `{"error": <message>, "details": <optional>}`. There is no retry or
//! partial recovery; a failed transcription is terminal for that request.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::provider::ProviderError;
use crate::transcript::validate::ValidationError;

/// Errors surfaced by the HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file provided")]
    MissingFile,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Server configuration error: API key not configured")]
    MissingApiKey,

    #[error("Failed to read upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Wire shape of an error
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::Validation(_) | ApiError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            // Upstream failures keep the provider's status so the caller
            // can distinguish quota, auth, and payload problems
            ApiError::Provider(ProviderError::Upstream { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::Provider(ProviderError::Upstream { body, .. }) if !body.is_empty() => {
                Some(body.clone())
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("Transcription request failed: {}", self);
        } else {
            warn!("Transcription request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}
