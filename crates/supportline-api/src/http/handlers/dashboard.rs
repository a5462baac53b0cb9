//! Feedback dashboard endpoint.
//!
//! GET /api/v1/dashboard - Aggregate rating stats plus a paginated,
//! most-recent-first feed of feedback entries joined with their author and
//! target message.

use std::time::Instant;

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use supportline_types::feedback::{FeedbackEntry, FeedbackStats};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for the feedback feed.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// Response payload for GET /api/v1/dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: FeedbackStats,
    pub recent_feedback: Vec<FeedbackEntry>,
}

/// GET /api/v1/dashboard - Feedback stats and recent entries.
pub async fn get_dashboard(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> Result<ApiResponse<DashboardResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let stats = state.feedback_service.stats().await?;
    let recent_feedback = state
        .feedback_service
        .recent(query.limit, query.offset)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(
        DashboardResponse {
            stats,
            recent_feedback,
        },
        request_id,
        elapsed,
    )
    .with_link("self", "/api/v1/dashboard"))
}
