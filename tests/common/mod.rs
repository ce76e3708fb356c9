//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use feedback_core::{
    api::{ApiServer, AppState},
    FeedbackStore, SqliteFeedbackStore, Summarizer, SummarizerError,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt; // for Router::oneshot

/// Summarizer that records prompts and answers with a fixed result
pub struct RecordingSummarizer {
    pub prompts: Mutex<Vec<String>>,
    result: Result<String, SummarizerError>,
}

impl RecordingSummarizer {
    pub fn answering(summary: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            result: Ok(summary.to_string()),
        }
    }

    pub fn failing(err: SummarizerError) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            result: Err(err),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for RecordingSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizerError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.result.clone()
    }
}

/// Store on a fresh database file
pub async fn create_test_store() -> (Arc<SqliteFeedbackStore>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteFeedbackStore::new(temp_dir.path().join("feedback.db"))
        .expect("Failed to create test store");
    store.ensure_schema().await.expect("Failed to create schema");
    (Arc::new(store), temp_dir)
}

/// Router over a fresh store, with static assets served from the temp dir
pub async fn create_test_app(
    summarizer: Arc<dyn Summarizer>,
) -> (Router, Arc<SqliteFeedbackStore>, TempDir) {
    let (store, temp_dir) = create_test_store().await;
    let state = AppState::new(store.clone(), summarizer);
    let router = ApiServer::build_router(state, temp_dir.path());
    (router, store, temp_dir)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}
