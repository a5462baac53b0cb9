//! AI configuration listing endpoint.
//!
//! GET /api/v1/configurations - (key, display name) pairs for the
//! session-creation dropdown.

use std::time::Instant;

use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// One selectable configuration profile.
#[derive(Debug, Serialize)]
pub struct ConfigurationEntry {
    pub key: String,
    pub name: String,
}

/// GET /api/v1/configurations - Available AI configuration profiles.
pub async fn list_configurations(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<ApiResponse<Vec<ConfigurationEntry>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entries = state
        .configurations
        .display_names()
        .into_iter()
        .map(|(key, name)| ConfigurationEntry { key, name })
        .collect();

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(entries, request_id, elapsed)
        .with_link("self", "/api/v1/configurations"))
}
