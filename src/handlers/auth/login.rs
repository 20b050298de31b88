// handlers/auth/login.rs - POST /login handler

use axum::{extract::State, response::Json};
use serde::Serialize;

use super::FormData;
use crate::error::ApiError;
use crate::middleware::ValidJson;
use crate::services::AuthGateway;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: String,
    pub access_token: String,
}

/// POST /login - Authenticate with email and password
///
/// `name` must be present in the body but is ignored. Every failure is a 401.
pub async fn login_post(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<FormData>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = AuthGateway::new(state.auth())
        .login(&form.email, &form.password)
        .await
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: session.user_email,
        access_token: session.access_token,
    }))
}
