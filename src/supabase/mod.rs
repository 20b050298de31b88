//! Supabase client for auth (GoTrue) and table/RPC access (PostgREST).
//!
//! Only the handful of calls the service needs are implemented; each one is a
//! single request with no retry.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::ExposeSecret;
use url::Url;

use crate::config::SupabaseConfig;

pub mod auth;
pub mod error;
pub mod rest;

pub use error::SupabaseError;
pub use rest::SelectQuery;

/// Supabase client shared by every request.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl SupabaseClient {
    /// Create a client authenticated with the project key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> Result<Self, SupabaseError> {
        let key = config.key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(key).map_err(|_| SupabaseError::InvalidKey)?,
        );
        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| SupabaseError::InvalidKey)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        // Url::join drops the last path segment unless the base ends with '/'
        let mut base_url = config.url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(SupabaseClientInner { client, base_url }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SupabaseError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| SupabaseError::Url(e.to_string()))
    }

    fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Read the body of a response, turning non-success statuses into errors.
    async fn read_body(response: reqwest::Response) -> Result<String, SupabaseError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(error::api_error(status, &body))
        }
    }
}
