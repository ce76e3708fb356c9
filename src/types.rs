//! Core data structures for feedback records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned feedback identifier
pub type FeedbackId = i64;

/// Category used when a submission does not name one
pub const DEFAULT_CATEGORY: &str = "other";

/// A persisted feedback entry
///
/// Records are immutable once written: `id` and `created_at` are assigned by the
/// store and there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub user: String,
    pub text: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new feedback record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub user: String,
    pub text: String,
    pub category: String,
}

impl NewFeedback {
    /// Build a submission, applying the default user and category.
    ///
    /// Returns `None` when `text` is missing or empty.
    pub fn new(user: Option<String>, text: Option<String>, category: Option<String>) -> Option<Self> {
        let text = text.filter(|t| !t.is_empty())?;

        Some(Self {
            user: user.unwrap_or_default(),
            text,
            category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        })
    }
}
