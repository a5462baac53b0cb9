//! FeedbackRepository trait definition.
//!
//! Persistence port for message feedback. Follows the same RPITIT pattern
//! as `ChatRepository`; the SQLite implementation lives in
//! supportline-infra.

use supportline_types::error::RepositoryError;
use supportline_types::feedback::{Feedback, FeedbackCounts, FeedbackEntry};
use uuid::Uuid;

/// Repository trait for feedback persistence and aggregation.
pub trait FeedbackRepository: Send + Sync {
    /// Insert feedback, or overwrite rating and comment when the
    /// (message, user) pair already has a row. Returns the stored row;
    /// on overwrite the original id and created_at are kept.
    ///
    /// The storage layer's unique constraint makes this safe under
    /// concurrent duplicate submissions: a conflicting insert resolves to
    /// an update rather than an error.
    fn upsert(
        &self,
        feedback: &Feedback,
    ) -> impl std::future::Future<Output = Result<Feedback, RepositoryError>> + Send;

    /// Fetch one user's feedback on one message.
    fn get(
        &self,
        message_id: &Uuid,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Feedback>, RepositoryError>> + Send;

    /// Rating counts across the whole store.
    fn counts(
        &self,
    ) -> impl std::future::Future<Output = Result<FeedbackCounts, RepositoryError>> + Send;

    /// Most-recent-first feedback entries joined with the rating author
    /// and the target message.
    fn recent(
        &self,
        limit: i64,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<Vec<FeedbackEntry>, RepositoryError>> + Send;
}
