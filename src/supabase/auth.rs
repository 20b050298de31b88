//! GoTrue sign-up and password sign-in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{SupabaseClient, SupabaseError};
use crate::services::traits::AuthProvider;
use crate::types::{AuthUser, Session};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Sign-up answers with a session when email confirmation is off and with the
/// bare user object when it is on.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    WithSession(Session),
    UserOnly(AuthUser),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignInResponse {
    Session(Session),
    Other(serde_json::Value),
}

impl SupabaseClient {
    /// Register a new user with email and password.
    ///
    /// Returns `Ok(None)` when GoTrue answers successfully without a user
    /// object.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthUser>, SupabaseError> {
        let response = self
            .http()
            .post(self.endpoint("auth/v1/signup")?)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body = Self::read_body(response).await?;

        let parsed: SignUpResponse =
            serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(e.to_string()))?;

        Ok(match parsed {
            SignUpResponse::WithSession(session) => Some(session.user),
            SignUpResponse::UserOnly(user) => Some(user),
            SignUpResponse::Other(_) => None,
        })
    }

    /// Exchange email and password for a session.
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, SupabaseError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .http()
            .post(url)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body = Self::read_body(response).await?;

        let parsed: SignInResponse =
            serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(e.to_string()))?;

        Ok(match parsed {
            SignInResponse::Session(session) => Some(session),
            SignInResponse::Other(_) => None,
        })
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthUser>, SupabaseError> {
        SupabaseClient::sign_up(self, email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<Session>, SupabaseError> {
        self.sign_in_with_password(email, password).await
    }
}
