//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use supportline_types::error::ChatError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat/feedback workflow errors.
    Chat(ChatError),
    /// Authentication failure.
    Unauthorized(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn status_code_and_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::NotFound) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Session or message not found".to_string(),
            ),
            AppError::Chat(ChatError::Forbidden) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "You do not have access to this session".to_string(),
            ),
            AppError::Chat(ChatError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::InvalidTarget) => (
                StatusCode::FORBIDDEN,
                "INVALID_FEEDBACK_TARGET",
                "Feedback can only be submitted for AI messages".to_string(),
            ),
            AppError::Chat(ChatError::Upstream(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_ERROR",
                "Sorry, I encountered an error trying to respond".to_string(),
            ),
            AppError::Chat(ChatError::ServerConfiguration) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SERVER_CONFIGURATION_ERROR",
                "Server configuration error".to_string(),
            ),
            AppError::Chat(ChatError::Storage(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_and_message();
        let envelope = ApiResponse::error(code, &message);
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Chat(ChatError::NotFound), StatusCode::NOT_FOUND),
            (AppError::Chat(ChatError::Forbidden), StatusCode::FORBIDDEN),
            (
                AppError::Chat(ChatError::Validation("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Chat(ChatError::InvalidTarget),
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::Chat(ChatError::Upstream("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Chat(ChatError::ServerConfiguration),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Unauthorized("no key".into()),
                StatusCode::UNAUTHORIZED,
            ),
        ];
        for (err, expected) in cases {
            let (status, _, _) = err.status_code_and_message();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_upstream_error_hides_details() {
        let err = AppError::Chat(ChatError::Upstream("secret internal detail".into()));
        let (_, code, message) = err.status_code_and_message();
        assert_eq!(code, "UPSTREAM_ERROR");
        assert!(!message.contains("secret"));
    }
}
