//! Storage layer for feedback records
//!
//! Provides the store abstraction handlers are injected with, and the SQLite
//! implementation used in production.

pub mod sqlite;

use crate::error::Result;
use crate::types::{FeedbackId, FeedbackRecord, NewFeedback};
use async_trait::async_trait;

/// Storage backend trait defining all required operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Create the feedback table if it does not exist
    async fn ensure_schema(&self) -> Result<()>;

    /// Append a record, returning its store-assigned id
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackId>;

    /// Up to `limit` records, newest first
    async fn list_recent(&self, limit: usize) -> Result<Vec<FeedbackRecord>>;
}
