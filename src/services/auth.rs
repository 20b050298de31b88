use thiserror::Error;
use tracing::{info, warn};

use super::traits::AuthProvider;
use crate::types::AuthUser;

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("User not created.")]
    UserNotCreated,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Message reported by the identity provider
    #[error("{0}")]
    Provider(String),
}

/// Result of a successful password sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSession {
    pub user_email: String,
    pub access_token: String,
}

/// Registration and login against the identity provider.
///
/// Tokens are handed back exactly as issued; nothing is stored or refreshed.
pub struct AuthGateway<'a> {
    provider: &'a dyn AuthProvider,
}

impl<'a> AuthGateway<'a> {
    pub fn new(provider: &'a dyn AuthProvider) -> Self {
        Self { provider }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        match self.provider.sign_up(email, password).await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "user registered");
                Ok(user)
            }
            Ok(None) => Err(AuthError::UserNotCreated),
            Err(e) => {
                warn!(error = %e, "sign-up rejected");
                Err(AuthError::Provider(e.to_string()))
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AuthError> {
        match self.provider.sign_in(email, password).await {
            Ok(Some(session)) => Ok(LoginSession {
                user_email: session.user.email.unwrap_or_else(|| email.to_string()),
                access_token: session.access_token,
            }),
            Ok(None) => Err(AuthError::InvalidCredentials),
            Err(e) => {
                warn!(error = %e, "sign-in rejected");
                Err(AuthError::Provider(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supabase::SupabaseError;
    use crate::types::Session;
    use async_trait::async_trait;

    enum Reply {
        Created,
        Nothing,
        Rejected(&'static str),
    }

    struct StubProvider(Reply);

    #[async_trait]
    impl AuthProvider for StubProvider {
        async fn sign_up(&self, email: &str, _password: &str) -> Result<Option<AuthUser>, SupabaseError> {
            match self.0 {
                Reply::Created => Ok(Some(AuthUser {
                    id: "u-1".to_string(),
                    email: Some(email.to_string()),
                })),
                Reply::Nothing => Ok(None),
                Reply::Rejected(msg) => Err(SupabaseError::Api {
                    status: 422,
                    message: msg.to_string(),
                }),
            }
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<Option<Session>, SupabaseError> {
            match self.0 {
                Reply::Created => Ok(Some(Session {
                    access_token: "jwt-abc".to_string(),
                    token_type: Some("bearer".to_string()),
                    expires_in: Some(3600),
                    refresh_token: None,
                    user: AuthUser {
                        id: "u-1".to_string(),
                        email: None,
                    },
                })),
                Reply::Nothing => Ok(None),
                Reply::Rejected(msg) => Err(SupabaseError::Api {
                    status: 400,
                    message: msg.to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn register_returns_created_user() {
        let provider = StubProvider(Reply::Created);
        let user = AuthGateway::new(&provider).register("a@shop.io", "pw").await.unwrap();
        assert_eq!(user.email.as_deref(), Some("a@shop.io"));
    }

    #[tokio::test]
    async fn register_without_user_object_fails() {
        let provider = StubProvider(Reply::Nothing);
        let err = AuthGateway::new(&provider).register("a@shop.io", "pw").await.unwrap_err();
        assert_eq!(err, AuthError::UserNotCreated);
        assert_eq!(err.to_string(), "User not created.");
    }

    #[tokio::test]
    async fn register_carries_provider_message() {
        let provider = StubProvider(Reply::Rejected("User already registered"));
        let err = AuthGateway::new(&provider).register("a@shop.io", "pw").await.unwrap_err();
        assert_eq!(err, AuthError::Provider("User already registered".to_string()));
    }

    #[tokio::test]
    async fn login_falls_back_to_requested_email() {
        let provider = StubProvider(Reply::Created);
        let session = AuthGateway::new(&provider).login("a@shop.io", "pw").await.unwrap();
        assert_eq!(session.user_email, "a@shop.io");
        assert_eq!(session.access_token, "jwt-abc");
    }

    #[tokio::test]
    async fn login_without_session_is_invalid_credentials() {
        let provider = StubProvider(Reply::Nothing);
        let err = AuthGateway::new(&provider).login("a@shop.io", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials.");
    }
}
