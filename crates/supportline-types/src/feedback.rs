//! Feedback types: per-message thumbs up/down ratings and dashboard rows.
//!
//! A user can rate an AI message at most once; resubmitting overwrites the
//! previous rating and comment. The (message, user) pair is unique at the
//! storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Thumbs up/down rating on an AI message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (rating IN ('positive', 'negative'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Positive,
    Negative,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Positive => write!(f, "positive"),
            Rating::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Rating::Positive),
            "negative" => Ok(Rating::Negative),
            other => Err(format!("invalid rating: '{other}'")),
        }
    }
}

/// A single feedback row: one rating (plus optional comment) per
/// (AI message, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub rating: Rating,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw rating counts over the whole feedback store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackCounts {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
}

impl FeedbackCounts {
    /// Share of positive ratings as a percentage, rounded to one decimal.
    ///
    /// Returns 0.0 when there is no feedback at all.
    pub fn positive_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.positive as f64 / self.total as f64 * 1000.0).round() / 10.0
    }
}

/// Aggregate numbers shown at the top of the feedback dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
    pub positive_percentage: f64,
    pub total_sessions: u64,
}

/// The user who left a feedback entry, as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackAuthor {
    pub id: Uuid,
    pub name: String,
}

/// The AI message a feedback entry targets, with its session for linking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackTarget {
    pub id: Uuid,
    pub body: String,
    pub session_id: Uuid,
}

/// One row of the dashboard's most-recent-first feedback feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub rating: Rating,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user: FeedbackAuthor,
    pub message: FeedbackTarget,
}
