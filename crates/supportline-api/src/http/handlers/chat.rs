//! Chat HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/chat          - Send a message, get the AI reply
//! - GET  /api/v1/chat/history  - Full history for a session
//! - POST /api/v1/chat/feedback - Rate an AI message

use std::time::Instant;

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use supportline_types::chat::Sender;
use supportline_types::feedback::Rating;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for POST /api/v1/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Uuid,
}

/// Response payload for POST /api/v1/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub ai_message_id: Uuid,
    pub session_title: Option<String>,
}

/// POST /api/v1/chat - One conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<ChatRequest>,
) -> Result<ApiResponse<ChatResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let reply = state
        .chat_service
        .submit_message(&user.id, &body.session_id, &body.message)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(
        ChatResponse {
            reply: reply.reply,
            ai_message_id: reply.ai_message_id,
            session_title: reply.session_title,
        },
        request_id,
        elapsed,
    )
    .with_link(
        "history",
        &format!("/api/v1/chat/history?session_id={}", body.session_id),
    ))
}

/// Query parameters for GET /api/v1/chat/history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub session_id: Uuid,
}

/// One message in the history payload. Wire field names match what the
/// chat frontend expects.
#[derive(Debug, Serialize)]
pub struct HistoryMessage {
    pub db_id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "feedbackGiven")]
    pub feedback_given: Option<Rating>,
}

/// Response payload for GET /api/v1/chat/history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryMessage>,
}

/// GET /api/v1/chat/history?session_id= - Ordered history with the
/// caller's own feedback annotations.
pub async fn history(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> Result<ApiResponse<HistoryResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entries = state
        .chat_service
        .history(&user.id, &query.session_id)
        .await?;

    let messages = entries
        .into_iter()
        .map(|entry| HistoryMessage {
            db_id: entry.message.id,
            sender: entry.message.sender,
            text: entry.message.body,
            created_at: entry.message.created_at,
            feedback_given: entry.feedback_given,
        })
        .collect();

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(
        ApiResponse::success(HistoryResponse { messages }, request_id, elapsed).with_link(
            "session",
            &format!("/api/v1/sessions/{}", query.session_id),
        ),
    )
}

/// Request body for POST /api/v1/chat/feedback.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub message_id: Uuid,
    pub rating: Rating,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Response payload for POST /api/v1/chat/feedback.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub feedback_id: Uuid,
}

/// POST /api/v1/chat/feedback - Upsert a rating on an AI message.
pub async fn feedback(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<FeedbackRequest>,
) -> Result<ApiResponse<FeedbackResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let stored = state
        .feedback_service
        .submit(&user.id, &body.message_id, body.rating, body.comment)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(
        FeedbackResponse {
            success: true,
            feedback_id: stored.id,
        },
        request_id,
        elapsed,
    ))
}
