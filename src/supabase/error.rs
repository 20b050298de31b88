//! Error types for the Supabase client.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to Supabase (GoTrue or PostgREST).
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Supabase answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The service key cannot be sent as a header.
    #[error("invalid Supabase key")]
    InvalidKey,

    #[error("invalid Supabase URL: {0}")]
    Url(String),
}

impl SupabaseError {
    /// True when Supabase rejected the request itself (4xx), as opposed to
    /// transport failures or server-side errors.
    pub fn is_rejection(&self) -> bool {
        matches!(self, SupabaseError::Api { status, .. } if (400..500).contains(status))
    }
}

/// Error payload returned by GoTrue and PostgREST.
///
/// The two services and their versions disagree on field names, so every
/// known spelling is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or_else(|| self.error.and_then(|e| e.as_str().map(str::to_string)))
    }
}

/// Build an `Api` error from a status and raw body.
pub(crate) fn api_error(status: reqwest::StatusCode, body: &str) -> SupabaseError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.to_string()
            }
        });

    SupabaseError::Api {
        status: status.as_u16(),
        message,
    }
}
