// handlers/query.rs - POST /query handler

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::ValidJson;
use crate::services::{ensure_read_only, QueryExecutor, SqlTranslator};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub sql: String,
    pub result: Vec<Value>,
}

/// POST /query - Translate English to SQL and run it through the RPC
///
/// Once SQL has been generated, every failure carries it in `sql` so the
/// caller can see what was attempted.
pub async fn query_post(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let sql = SqlTranslator::new(state.llm()).translate(&request.query).await?;

    let config = &state.config().query;
    if config.read_only {
        ensure_read_only(&sql).map_err(|e| ApiError::from(e).with_sql(&sql))?;
    }

    let result = QueryExecutor::new(state.store(), &config.rpc_function)
        .execute(&sql)
        .await
        .map_err(|e| ApiError::from(e).with_sql(&sql))?;

    Ok(Json(QueryResponse { sql, result }))
}
