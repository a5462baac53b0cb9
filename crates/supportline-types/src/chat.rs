//! Chat session and message types for Supportline.
//!
//! A session is a conversation thread owned by exactly one user. Messages
//! are append-only turns within a session, ordered by creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::feedback::Rating;

/// Who authored a message turn.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('user', 'ai'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A support chat session owned by a single user.
///
/// `config_key` selects the AI configuration profile used when dispatching
/// messages; it is validated at creation time but resolved again (with a
/// fallback to `default`) on every dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub config_key: String,
    pub created_at: DateTime<Utc>,
}

/// A single message turn within a chat session.
///
/// Immutable once created; removed only when its session is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender: Sender,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A message annotated with the viewing user's own feedback rating.
///
/// Feedback left by other raters is never attached here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub message: ChatMessage,
    pub feedback_given: Option<Rating>,
}
