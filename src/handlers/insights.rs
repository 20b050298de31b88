// handlers/insights.rs - GET /insights handler

use axum::{extract::State, response::Json};

use crate::error::ApiError;
use crate::services::{InsightAggregator, InsightSummary};
use crate::state::AppState;

/// GET /insights - Top stores by availability, slowest SKUs, and an LLM summary
///
/// The window ends at the current UTC date, so results change over time.
pub async fn insights_get(State(state): State<AppState>) -> Result<Json<InsightSummary>, ApiError> {
    let today = chrono::Utc::now().date_naive();

    let summary = InsightAggregator::new(state.store(), state.llm(), &state.config().insights)
        .compute(today)
        .await?;

    Ok(Json(summary))
}
