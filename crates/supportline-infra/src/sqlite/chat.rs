//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `supportline-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, UUIDs and
//! RFC3339 timestamps stored as TEXT.

use sqlx::Row;
use uuid::Uuid;

use supportline_core::chat::repository::ChatRepository;
use supportline_types::chat::{ChatMessage, ChatSession, HistoryEntry, Sender};
use supportline_types::error::RepositoryError;
use supportline_types::feedback::Rating;

use super::pool::DatabasePool;
use chrono::{DateTime, Utc};

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatSessionRow {
    id: String,
    user_id: String,
    title: Option<String>,
    config_key: String,
    created_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            config_key: row.try_get("config_key")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        let id = parse_uuid(&self.id, "session id")?;
        let user_id = parse_uuid(&self.user_id, "user_id")?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ChatSession {
            id,
            user_id,
            title: self.title,
            config_key: self.config_key,
            created_at,
        })
    }
}

struct ChatMessageRow {
    id: String,
    session_id: String,
    sender: String,
    body: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            sender: row.try_get("sender")?,
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = parse_uuid(&self.id, "message id")?;
        let session_id = parse_uuid(&self.session_id, "session_id")?;
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ChatMessage {
            id,
            session_id,
            sender,
            body: self.body,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_uuid(s: &str, what: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid {what}: {e}")))
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_session(
        &self,
        session: &ChatSession,
    ) -> Result<ChatSession, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_sessions (id, user_id, title, config_key, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.title)
        .bind(&session.config_key)
        .bind(format_datetime(&session.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(session.clone())
    }

    async fn get_session(
        &self,
        session_id: &Uuid,
    ) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let session_row = ChatSessionRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn list_sessions(
        &self,
        user_id: &Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM chat_sessions
               WHERE user_id = ?
               ORDER BY created_at DESC, id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(user_id.to_string())
        .bind(limit.unwrap_or(-1))
        .bind(offset.unwrap_or(0))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                ChatSessionRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_session()
            })
            .collect()
    }

    async fn update_session_title(
        &self,
        session_id: &Uuid,
        title: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chat_sessions SET title = ? WHERE id = ?")
            .bind(title)
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_messages (id, session_id, sender, body, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.sender.to_string())
        .bind(&message.body)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn get_message(
        &self,
        message_id: &Uuid,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_messages WHERE id = ?")
            .bind(message_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let message_row = ChatMessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(message_row.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM chat_messages
               WHERE session_id = ?
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                ChatMessageRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_message()
            })
            .collect()
    }

    async fn get_history(
        &self,
        session_id: &Uuid,
        viewer_id: &Uuid,
    ) -> Result<Vec<HistoryEntry>, RepositoryError> {
        // Only the viewer's own feedback is joined in; other raters'
        // feedback stays private.
        let rows = sqlx::query(
            r#"SELECT m.*, f.rating AS feedback_rating
               FROM chat_messages m
               LEFT JOIN chat_feedback f
                 ON f.message_id = m.id AND f.user_id = ?
               WHERE m.session_id = ?
               ORDER BY m.created_at ASC, m.id ASC"#,
        )
        .bind(viewer_id.to_string())
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let message = ChatMessageRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_message()?;
                let feedback_given = row
                    .try_get::<Option<String>, _>("feedback_rating")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .map(|s| s.parse::<Rating>())
                    .transpose()
                    .map_err(RepositoryError::Query)?;
                Ok(HistoryEntry {
                    message,
                    feedback_given,
                })
            })
            .collect()
    }

    async fn count_sessions(&self) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_sessions")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(row.0 as u64)
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(row.0 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn test_pool() -> (DatabasePool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        (DatabasePool::new(&url).await.unwrap(), dir)
    }

    async fn seed_user(pool: &DatabasePool) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind("Test User")
            .bind(format!("{id}@example.com"))
            .bind(Utc::now().to_rfc3339())
            .execute(&pool.writer)
            .await
            .unwrap();
        id
    }

    fn session_for(user_id: Uuid) -> ChatSession {
        ChatSession {
            id: Uuid::now_v7(),
            user_id,
            title: None,
            config_key: "default".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let (pool, _dir) = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        let session = session_for(user_id);
        repo.create_session(&session).await.unwrap();

        let loaded = repo.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.user_id, user_id);
        assert_eq!(loaded.config_key, "default");
        assert!(loaded.title.is_none());

        assert!(repo.get_session(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_title_and_list_order() {
        let (pool, _dir) = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        let first = session_for(user_id);
        repo.create_session(&first).await.unwrap();
        let second = session_for(user_id);
        repo.create_session(&second).await.unwrap();

        repo.update_session_title(&first.id, "Billing question")
            .await
            .unwrap();

        let sessions = repo.list_sessions(&user_id, Some(10), Some(0)).await.unwrap();
        assert_eq!(sessions.len(), 2);
        // Most recent first
        assert_eq!(sessions[0].id, second.id);
        assert_eq!(sessions[1].title.as_deref(), Some("Billing question"));

        assert!(matches!(
            repo.update_session_title(&Uuid::now_v7(), "x").await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_messages_ordered_ascending() {
        let (pool, _dir) = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        let session = session_for(user_id);
        repo.create_session(&session).await.unwrap();

        for (i, sender) in [Sender::User, Sender::Ai, Sender::User].iter().enumerate() {
            repo.save_message(&ChatMessage {
                id: Uuid::now_v7(),
                session_id: session.id,
                sender: *sender,
                body: format!("turn {i}"),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        }

        let messages = repo.get_messages(&session.id).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].body, "turn 0");
        assert_eq!(messages[2].body, "turn 2");
        assert_eq!(repo.count_messages().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_session_cascades_messages() {
        let (pool, _dir) = test_pool().await;
        let user_id = seed_user(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        let session = session_for(user_id);
        repo.create_session(&session).await.unwrap();
        repo.save_message(&ChatMessage {
            id: Uuid::now_v7(),
            session_id: session.id,
            sender: Sender::User,
            body: "hello".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

        repo.delete_session(&session.id).await.unwrap();

        assert!(repo.get_session(&session.id).await.unwrap().is_none());
        assert_eq!(repo.count_messages().await.unwrap(), 0);
        assert_eq!(repo.count_sessions().await.unwrap(), 0);
    }
}
