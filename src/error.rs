// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::services::{ExecutionError, GuardError, InsightError, TranslateError};

/// HTTP API error with status code and client-facing message.
///
/// Every route reports failures through this type, so the body shape is the
/// same everywhere: `{"detail": ..., "code": ...}` plus `sql` when a
/// generated statement is involved.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity
    ValidationError(String),
    UnsafeQuery(String),
    QueryFailed(String),

    // 502 Bad Gateway (Supabase / OpenAI failures)
    BadGateway(String),

    /// Any of the above, tagged with the SQL that was generated
    WithSql { source: Box<ApiError>, sql: String },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::ValidationError(_) => 422,
            ApiError::UnsafeQuery(_) => 422,
            ApiError::QueryFailed(_) => 422,
            ApiError::BadGateway(_) => 502,
            ApiError::WithSql { source, .. } => source.status_code(),
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::ValidationError(msg) => msg,
            ApiError::UnsafeQuery(msg) => msg,
            ApiError::QueryFailed(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::WithSql { source, .. } => source.message(),
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::UnsafeQuery(_) => "UNSAFE_QUERY",
            ApiError::QueryFailed(_) => "QUERY_FAILED",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::WithSql { source, .. } => source.error_code(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::WithSql { source, sql } => {
                let mut body = source.to_json();
                body["sql"] = json!(sql);
                body
            }
            _ => json!({
                "detail": self.message(),
                "code": self.error_code()
            }),
        }
    }

    /// Attach the generated SQL to this error
    pub fn with_sql(self, sql: impl Into<String>) -> Self {
        ApiError::WithSql {
            source: Box::new(self),
            sql: sql.into(),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        ApiError::ValidationError(message.into())
    }

    pub fn unsafe_query(message: impl Into<String>) -> Self {
        ApiError::UnsafeQuery(message.into())
    }

    pub fn query_failed(message: impl Into<String>) -> Self {
        ApiError::QueryFailed(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }
}

// Convert service error types to ApiError
impl From<InsightError> for ApiError {
    fn from(err: InsightError) -> Self {
        tracing::error!("Insight aggregation failed: {}", err);
        ApiError::bad_gateway(err.to_string())
    }
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        tracing::error!("SQL translation failed: {}", err);
        ApiError::bad_gateway(err.to_string())
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        tracing::warn!("Generated SQL rejected: {}", err);
        ApiError::unsafe_query(err.to_string())
    }
}

impl From<ExecutionError> for ApiError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::NoData => ApiError::not_found(err.to_string()),
            ExecutionError::Rejected(msg) => {
                tracing::warn!("Raw SQL rejected by database: {}", msg);
                ApiError::query_failed(msg)
            }
            ExecutionError::Upstream(e) => {
                tracing::error!("Raw SQL execution failed: {}", e);
                ApiError::bad_gateway(e.to_string())
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
