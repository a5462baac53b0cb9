//! SQLite user store.
//!
//! Users are created from the CLI; authentication is API-key based, with
//! key hashes referencing a user row. The HTTP auth extractor queries the
//! api_keys table directly, so this store only covers account creation
//! and lookups.

use sqlx::Row;
use uuid::Uuid;

use supportline_types::error::RepositoryError;
use supportline_types::user::User;

use super::chat::{format_datetime, parse_datetime, parse_uuid};
use super::pool::DatabasePool;

/// SQLite-backed user store.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Insert a new user. Fails with `Conflict` when the email is taken.
    pub async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(e) if e.to_string().contains("UNIQUE constraint failed") => Err(
                RepositoryError::Conflict(format!("email '{}' already exists", user.email)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| {
            Ok(User {
                id: parse_uuid(
                    &row.try_get::<String, _>("id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    "user id",
                )?,
                name: row
                    .try_get("name")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                email: row
                    .try_get("email")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                created_at: parse_datetime(
                    &row.try_get::<String, _>("created_at")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                )?,
            })
        })
        .transpose()
    }

    /// Store a hashed API key for a user.
    pub async fn create_api_key(
        &self,
        user_id: &Uuid,
        key_hash: &str,
        name: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO api_keys (id, user_id, key_hash, name, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user_id.to_string())
        .bind(key_hash)
        .bind(name)
        .bind(format_datetime(&chrono::Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    /// Count user accounts.
    pub async fn count_users(&self) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(row.0 as u64)
    }
}
