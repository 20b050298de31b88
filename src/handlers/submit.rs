// handlers/submit.rs - POST /submit handler

use axum::response::Json;
use serde::Serialize;

use super::auth::FormData;
use crate::middleware::ValidJson;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
}

/// POST /submit - Echo the form back; no side effects
pub async fn submit_post(ValidJson(form): ValidJson<FormData>) -> Json<SubmitResponse> {
    Json(SubmitResponse {
        message: format!("Hello {}, your email is {}", form.name, form.email),
    })
}
