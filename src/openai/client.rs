//! OpenAI chat completions client.
//!
//! Non-streaming only: every call is one request and one complete response.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::ExposeSecret;
use tracing::{info, instrument};

use crate::config::OpenAiConfig;
use crate::services::traits::LanguageModel;

use super::error::{ApiErrorResponse, OpenAiError};
use super::types::{ChatMessage, ChatRequest, ChatResponse};

#[derive(Clone)]
pub struct OpenAiClient {
    inner: Arc<OpenAiClientInner>,
}

struct OpenAiClientInner {
    client: reqwest::Client,
    model: String,
    completions_url: String,
}

impl OpenAiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &OpenAiConfig, timeout: Duration) -> Result<Self, OpenAiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
            .map_err(|_| OpenAiError::InvalidKey)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(OpenAiClientInner {
                client,
                model: config.model.clone(),
                completions_url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            }),
        })
    }

    /// Send a chat request and get a complete response.
    #[instrument(skip(self, messages), fields(model = %self.inner.model))]
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse, OpenAiError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            messages,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.completions_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| OpenAiError::Parse(format!("Failed to parse response: {e}")))?;
        if let Some(usage) = parsed.usage {
            info!(total_tokens = usage.total_tokens, "chat completion finished");
        }
        Ok(parsed)
    }
}

async fn handle_error_status(status: reqwest::StatusCode, response: reqwest::Response) -> OpenAiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return OpenAiError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return OpenAiError::Unauthorized("Invalid API key".to_string());
    }

    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => OpenAiError::Api {
                error_type: api_error.error.error_type.unwrap_or_else(|| "unknown".to_string()),
                message: api_error.error.message,
            },
            Err(_) => OpenAiError::Api {
                error_type: "unknown".to_string(),
                message: body,
            },
        },
        Err(e) => OpenAiError::Http(e),
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, OpenAiError> {
        let response = self.chat(vec![ChatMessage::user(prompt)]).await?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or(OpenAiError::EmptyCompletion)
    }
}
