//! Shared handler state

use crate::services::Summarizer;
use crate::storage::FeedbackStore;
use std::sync::Arc;

/// Collaborators injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedbackStore>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl AppState {
    pub fn new(store: Arc<dyn FeedbackStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { store, summarizer }
    }
}
