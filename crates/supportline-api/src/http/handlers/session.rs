//! Session CRUD HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/sessions      - List the caller's sessions
//! - POST   /api/v1/sessions      - Start a new session
//! - GET    /api/v1/sessions/{id} - Get a single session
//! - PUT    /api/v1/sessions/{id} - Rename a session
//! - DELETE /api/v1/sessions/{id} - Delete a session
//!
//! Every operation enforces ownership through the chat service.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use supportline_types::chat::ChatSession;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for session listing.
#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Request body for session creation.
#[derive(Debug, Deserialize, Default)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub configuration_key: Option<String>,
}

/// Request body for session rename.
#[derive(Debug, Deserialize)]
pub struct RenameSessionRequest {
    pub title: String,
}

/// GET /api/v1/sessions - List the caller's sessions, most recent first.
pub async fn list_sessions(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<SessionListQuery>,
) -> Result<ApiResponse<Vec<ChatSession>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sessions = state
        .chat_service
        .list_sessions(&user.id, Some(query.limit), Some(query.offset))
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(sessions, request_id, elapsed)
        .with_link("self", "/api/v1/sessions")
        .with_link("configurations", "/api/v1/configurations"))
}

/// POST /api/v1/sessions - Start a new session, optionally pinning an AI
/// configuration profile.
pub async fn create_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateSessionRequest>,
) -> Result<ApiResponse<ChatSession>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state
        .chat_service
        .create_session(user.id, body.configuration_key)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let self_link = format!("/api/v1/sessions/{}", session.id);

    Ok(ApiResponse::success(session, request_id, elapsed).with_link("self", &self_link))
}

/// GET /api/v1/sessions/{id} - Get one of the caller's sessions.
pub async fn get_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
) -> Result<ApiResponse<ChatSession>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state
        .chat_service
        .session_for_user(&user.id, &session_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(session, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}"))
        .with_link(
            "history",
            &format!("/api/v1/chat/history?session_id={session_id}"),
        ))
}

/// PUT /api/v1/sessions/{id} - Rename a session.
pub async fn rename_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
    Json(body): Json<RenameSessionRequest>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state
        .chat_service
        .rename_session(&user.id, &session_id, &body.title)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(
        serde_json::json!({"renamed": true, "title": body.title}),
        request_id,
        elapsed,
    ))
}

/// DELETE /api/v1/sessions/{id} - Delete a session and everything in it.
pub async fn delete_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state
        .chat_service
        .delete_session(&user.id, &session_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(
        serde_json::json!({"deleted": true}),
        request_id,
        elapsed,
    ))
}
