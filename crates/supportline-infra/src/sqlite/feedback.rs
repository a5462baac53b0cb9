//! SQLite feedback repository implementation.
//!
//! The upsert relies on the UNIQUE(message_id, user_id) constraint:
//! `INSERT .. ON CONFLICT DO UPDATE` keeps the original row id and
//! created_at while overwriting rating, comment, and updated_at. Under
//! concurrent duplicate submissions the conflict clause resolves the race
//! instead of surfacing a constraint violation.

use sqlx::Row;
use uuid::Uuid;

use supportline_core::feedback::repository::FeedbackRepository;
use supportline_types::error::RepositoryError;
use supportline_types::feedback::{
    Feedback, FeedbackAuthor, FeedbackCounts, FeedbackEntry, FeedbackTarget, Rating,
};

use super::chat::{format_datetime, parse_datetime, parse_uuid};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `FeedbackRepository`.
pub struct SqliteFeedbackRepository {
    pool: DatabasePool,
}

impl SqliteFeedbackRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct FeedbackRow {
    id: String,
    message_id: String,
    user_id: String,
    rating: String,
    comment: Option<String>,
    created_at: String,
    updated_at: String,
}

impl FeedbackRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            message_id: row.try_get("message_id")?,
            user_id: row.try_get("user_id")?,
            rating: row.try_get("rating")?,
            comment: row.try_get("comment")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_feedback(self) -> Result<Feedback, RepositoryError> {
        Ok(Feedback {
            id: parse_uuid(&self.id, "feedback id")?,
            message_id: parse_uuid(&self.message_id, "message_id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            rating: self
                .rating
                .parse()
                .map_err(RepositoryError::Query)?,
            comment: self.comment,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl FeedbackRepository for SqliteFeedbackRepository {
    async fn upsert(&self, feedback: &Feedback) -> Result<Feedback, RepositoryError> {
        let row = sqlx::query(
            r#"INSERT INTO chat_feedback (id, message_id, user_id, rating, comment, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (message_id, user_id) DO UPDATE SET
                   rating = excluded.rating,
                   comment = excluded.comment,
                   updated_at = excluded.updated_at
               RETURNING *"#,
        )
        .bind(feedback.id.to_string())
        .bind(feedback.message_id.to_string())
        .bind(feedback.user_id.to_string())
        .bind(feedback.rating.to_string())
        .bind(&feedback.comment)
        .bind(format_datetime(&feedback.created_at))
        .bind(format_datetime(&feedback.updated_at))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        FeedbackRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_feedback()
    }

    async fn get(
        &self,
        message_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<Feedback>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM chat_feedback WHERE message_id = ? AND user_id = ?",
        )
        .bind(message_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let feedback_row = FeedbackRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(feedback_row.into_feedback()?))
            }
            None => Ok(None),
        }
    }

    async fn counts(&self) -> Result<FeedbackCounts, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT
                COUNT(*) as total,
                SUM(CASE WHEN rating = 'positive' THEN 1 ELSE 0 END) as positive,
                SUM(CASE WHEN rating = 'negative' THEN 1 ELSE 0 END) as negative
            FROM chat_feedback"#,
        )
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let total: i64 = row.try_get("total").unwrap_or(0);
        let positive: i64 = row.try_get("positive").unwrap_or(0);
        let negative: i64 = row.try_get("negative").unwrap_or(0);

        Ok(FeedbackCounts {
            total: total as u64,
            positive: positive as u64,
            negative: negative as u64,
        })
    }

    async fn recent(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedbackEntry>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT
                f.id, f.rating, f.comment, f.created_at,
                u.id AS rater_id, u.name AS rater_name,
                m.id AS target_id, m.body AS target_body, m.session_id AS target_session_id
            FROM chat_feedback f
            JOIN users u ON u.id = f.user_id
            JOIN chat_messages m ON m.id = f.message_id
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT ? OFFSET ?"#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let rating: Rating = row
                    .try_get::<String, _>("rating")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .parse()
                    .map_err(RepositoryError::Query)?;
                Ok(FeedbackEntry {
                    id: parse_uuid(
                        &row.try_get::<String, _>("id")
                            .map_err(|e| RepositoryError::Query(e.to_string()))?,
                        "feedback id",
                    )?,
                    rating,
                    comment: row
                        .try_get("comment")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    created_at: parse_datetime(
                        &row.try_get::<String, _>("created_at")
                            .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    )?,
                    user: FeedbackAuthor {
                        id: parse_uuid(
                            &row.try_get::<String, _>("rater_id")
                                .map_err(|e| RepositoryError::Query(e.to_string()))?,
                            "user_id",
                        )?,
                        name: row
                            .try_get("rater_name")
                            .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    },
                    message: FeedbackTarget {
                        id: parse_uuid(
                            &row.try_get::<String, _>("target_id")
                                .map_err(|e| RepositoryError::Query(e.to_string()))?,
                            "message_id",
                        )?,
                        body: row
                            .try_get("target_body")
                            .map_err(|e| RepositoryError::Query(e.to_string()))?,
                        session_id: parse_uuid(
                            &row.try_get::<String, _>("target_session_id")
                                .map_err(|e| RepositoryError::Query(e.to_string()))?,
                            "session_id",
                        )?,
                    },
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use supportline_core::chat::repository::ChatRepository;
    use supportline_types::chat::{ChatMessage, ChatSession, Sender};

    use crate::sqlite::chat::SqliteChatRepository;

    async fn test_pool() -> (DatabasePool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        (DatabasePool::new(&url).await.unwrap(), dir)
    }

    async fn seed_user(pool: &DatabasePool, name: &str) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(name)
            .bind(format!("{id}@example.com"))
            .bind(Utc::now().to_rfc3339())
            .execute(&pool.writer)
            .await
            .unwrap();
        id
    }

    async fn seed_ai_message(pool: &DatabasePool, user_id: Uuid) -> (Uuid, Uuid) {
        let chat_repo = SqliteChatRepository::new(pool.clone());
        let session = ChatSession {
            id: Uuid::now_v7(),
            user_id,
            title: None,
            config_key: "default".to_string(),
            created_at: Utc::now(),
        };
        chat_repo.create_session(&session).await.unwrap();
        let message = ChatMessage {
            id: Uuid::now_v7(),
            session_id: session.id,
            sender: Sender::Ai,
            body: "Try resetting your password.".to_string(),
            created_at: Utc::now(),
        };
        chat_repo.save_message(&message).await.unwrap();
        (session.id, message.id)
    }

    fn feedback_for(message_id: Uuid, user_id: Uuid, rating: Rating) -> Feedback {
        let now = Utc::now();
        Feedback {
            id: Uuid::now_v7(),
            message_id,
            user_id,
            rating,
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites_instead_of_duplicating() {
        let (pool, _dir) = test_pool().await;
        let user_id = seed_user(&pool, "Ada").await;
        let (_, message_id) = seed_ai_message(&pool, user_id).await;
        let repo = SqliteFeedbackRepository::new(pool);

        let first = repo
            .upsert(&feedback_for(message_id, user_id, Rating::Positive))
            .await
            .unwrap();

        let mut second = feedback_for(message_id, user_id, Rating::Negative);
        second.comment = Some("Actually this was wrong".to_string());
        let stored = repo.upsert(&second).await.unwrap();

        // Same row: the original id survives, rating and comment change.
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.rating, Rating::Negative);
        assert_eq!(stored.comment.as_deref(), Some("Actually this was wrong"));

        let counts = repo.counts().await.unwrap();
        assert_eq!(counts.total, 1);
        assert_eq!(counts.negative, 1);
        assert_eq!(counts.positive, 0);
    }

    #[tokio::test]
    async fn test_counts_empty_store() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteFeedbackRepository::new(pool);

        let counts = repo.counts().await.unwrap();
        assert_eq!(counts, FeedbackCounts::default());
        assert_eq!(counts.positive_percentage(), 0.0);
    }

    #[tokio::test]
    async fn test_distinct_raters_get_distinct_rows() {
        let (pool, _dir) = test_pool().await;
        let owner = seed_user(&pool, "Ada").await;
        let other = seed_user(&pool, "Grace").await;
        let (_, message_id) = seed_ai_message(&pool, owner).await;
        let repo = SqliteFeedbackRepository::new(pool);

        repo.upsert(&feedback_for(message_id, owner, Rating::Positive))
            .await
            .unwrap();
        repo.upsert(&feedback_for(message_id, other, Rating::Negative))
            .await
            .unwrap();

        let counts = repo.counts().await.unwrap();
        assert_eq!(counts.total, 2);

        let mine = repo.get(&message_id, &owner).await.unwrap().unwrap();
        assert_eq!(mine.rating, Rating::Positive);
    }

    #[tokio::test]
    async fn test_recent_feed_joins_and_orders() {
        let (pool, _dir) = test_pool().await;
        let user_id = seed_user(&pool, "Ada").await;
        let (session_id, message_id) = seed_ai_message(&pool, user_id).await;
        let (_, second_message_id) = seed_ai_message(&pool, user_id).await;
        let repo = SqliteFeedbackRepository::new(pool);

        let mut early = feedback_for(message_id, user_id, Rating::Positive);
        early.created_at = Utc::now() - chrono::Duration::minutes(5);
        repo.upsert(&early).await.unwrap();
        repo.upsert(&feedback_for(second_message_id, user_id, Rating::Negative))
            .await
            .unwrap();

        let feed = repo.recent(10, 0).await.unwrap();
        assert_eq!(feed.len(), 2);
        // Most recent first
        assert_eq!(feed[0].message.id, second_message_id);
        assert_eq!(feed[1].message.session_id, session_id);
        assert_eq!(feed[1].user.name, "Ada");
        assert_eq!(feed[1].message.body, "Try resetting your password.");

        let page = repo.recent(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].message.id, message_id);
    }
}
