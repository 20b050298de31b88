// handlers/auth/register.rs - POST /register handler

use axum::{extract::State, response::Json};
use serde::Serialize;

use super::FormData;
use crate::error::ApiError;
use crate::middleware::ValidJson;
use crate::services::AuthGateway;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// POST /register - Create an account with the identity provider
///
/// Any provider failure (duplicate email, weak password, no user created)
/// is a 400 with the provider's message in `detail`.
pub async fn register_post(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<FormData>,
) -> Result<Json<RegisterResponse>, ApiError> {
    AuthGateway::new(state.auth())
        .register(&form.email, &form.password)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
    }))
}
