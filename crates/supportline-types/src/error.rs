use thiserror::Error;

/// Errors from repository operations (used by trait definitions in
/// supportline-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the chat and feedback workflows.
///
/// The API layer maps each variant to an HTTP status; the orchestrator
/// never retries any of them.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("session or message not found")]
    NotFound,

    #[error("session belongs to another user")]
    Forbidden,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("feedback can only be submitted for AI messages")]
    InvalidTarget,

    #[error("AI provider request failed: {0}")]
    Upstream(String),

    #[error("default AI configuration is missing")]
    ServerConfiguration,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
