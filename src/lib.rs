//! Feedback Hub - feedback collection with LLM summaries
//!
//! Accepts user feedback over HTTP, keeps it in a local SQLite database, and
//! on request condenses recent feedback into themes through a hosted model.
//!
//! # Architecture
//!
//! The system is organized into several layers:
//! - **Types**: Core data structures (FeedbackRecord, NewFeedback)
//! - **Storage**: The `FeedbackStore` trait and its SQLite backend
//! - **Services**: Prompt construction and the Bedrock summarizer
//! - **API**: axum handlers, router and server lifecycle
//!
//! # Example
//!
//! ```ignore
//! use feedback_core::{api::{ApiServer, AppState}, AppConfig, BedrockSummarizer, SqliteFeedbackStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load(None)?;
//!     let store = SqliteFeedbackStore::open(&config.store).await?;
//!
//!     let summarizer = BedrockSummarizer::new(&config.summarizer)?;
//!     let state = AppState::new(Arc::new(store), Arc::new(summarizer));
//!
//!     ApiServer::new(config.server, state).serve().await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{FeedbackError, Result};
pub use services::{BedrockSummarizer, Summarizer, SummarizerError};
pub use storage::{sqlite::SqliteFeedbackStore, FeedbackStore};
pub use types::{FeedbackId, FeedbackRecord, NewFeedback};
