//! Feedback service: rating submission and dashboard aggregation.
//!
//! Generic over [`ChatRepository`] (to validate the rated message) and
//! [`FeedbackRepository`] (to store ratings and compute aggregates).

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use supportline_types::chat::Sender;
use supportline_types::error::ChatError;
use supportline_types::feedback::{Feedback, FeedbackEntry, FeedbackStats, Rating};

use crate::chat::repository::ChatRepository;
use crate::feedback::repository::FeedbackRepository;

/// Maximum feedback comment length, in characters.
pub const MAX_COMMENT_LEN: usize = 1000;

/// Records user feedback on AI messages and aggregates it for the
/// dashboard.
pub struct FeedbackService<C: ChatRepository, F: FeedbackRepository> {
    chat_repo: C,
    feedback_repo: F,
}

impl<C: ChatRepository, F: FeedbackRepository> FeedbackService<C, F> {
    /// Create a new feedback service with the given repositories.
    pub fn new(chat_repo: C, feedback_repo: F) -> Self {
        Self {
            chat_repo,
            feedback_repo,
        }
    }

    /// Submit (or overwrite) a rating for an AI message.
    ///
    /// Feedback is only collectible on AI-authored turns; a repeat
    /// submission for the same (message, user) pair overwrites the
    /// previous rating and comment instead of creating a duplicate.
    pub async fn submit(
        &self,
        user_id: &Uuid,
        message_id: &Uuid,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Feedback, ChatError> {
        if let Some(comment) = &comment {
            if comment.chars().count() > MAX_COMMENT_LEN {
                return Err(ChatError::Validation(format!(
                    "comment must be at most {MAX_COMMENT_LEN} characters"
                )));
            }
        }

        let message = self
            .chat_repo
            .get_message(message_id)
            .await?
            .ok_or(ChatError::NotFound)?;
        if message.sender != Sender::Ai {
            return Err(ChatError::InvalidTarget);
        }

        let now = Utc::now();
        let feedback = Feedback {
            id: Uuid::now_v7(),
            message_id: *message_id,
            user_id: *user_id,
            rating,
            comment,
            created_at: now,
            updated_at: now,
        };

        let stored = self.feedback_repo.upsert(&feedback).await?;
        info!(message_id = %message_id, rating = %stored.rating, "Feedback recorded");
        Ok(stored)
    }

    /// Aggregate stats for the dashboard header.
    pub async fn stats(&self) -> Result<FeedbackStats, ChatError> {
        let counts = self.feedback_repo.counts().await?;
        let total_sessions = self.chat_repo.count_sessions().await?;

        Ok(FeedbackStats {
            total: counts.total,
            positive: counts.positive,
            negative: counts.negative,
            positive_percentage: counts.positive_percentage(),
            total_sessions,
        })
    }

    /// Most-recent-first feedback feed for the dashboard.
    pub async fn recent(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedbackEntry>, ChatError> {
        Ok(self.feedback_repo.recent(limit, offset).await?)
    }
}
