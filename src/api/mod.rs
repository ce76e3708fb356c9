//! HTTP API for feedback collection and summaries
//!
//! Provides:
//! - Feedback submission and listing
//! - On-demand summaries from the hosted model
//! - Static front-end assets

pub mod errors;
pub mod handlers;
pub mod server;
pub mod state;

pub use errors::ApiError;
pub use server::ApiServer;
pub use state::AppState;
