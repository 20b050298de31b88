//! Error types for the OpenAI client.

use thiserror::Error;

/// Errors that can occur when calling the chat completions API.
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// OpenAI returned an error payload.
    #[error("API error ({error_type}): {message}")]
    Api { error_type: String, message: String },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The completion had no choices or no text.
    #[error("language model returned an empty completion")]
    EmptyCompletion,

    #[error("invalid OpenAI API key")]
    InvalidKey,
}

/// Error envelope returned by the OpenAI API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_error_display() {
        let err = OpenAiError::RateLimited(20);
        assert_eq!(err.to_string(), "rate limited, retry after 20 seconds");

        let err = OpenAiError::Api {
            error_type: "invalid_request_error".to_string(),
            message: "The model `gpt-5` does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (invalid_request_error): The model `gpt-5` does not exist"
        );
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.message, "Incorrect API key provided");
        assert_eq!(response.error.error_type.as_deref(), Some("invalid_request_error"));
    }
}
