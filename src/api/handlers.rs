//! Request handlers for the feedback API
//!
//! Every request is independent: handlers read or write through the injected
//! store and never hold state across calls.

use super::{errors::ApiError, state::AppState};
use crate::services::build_summary_prompt;
use crate::types::{FeedbackRecord, NewFeedback};
use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Records returned by the list endpoint
pub const LIST_LIMIT: usize = 100;

/// Records fed into each summary
pub const SUMMARY_LIMIT: usize = 50;

/// Submission body; absent and `null` fields take their defaults
#[derive(Debug, Default, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub user: Option<String>,
    pub text: Option<String>,
    pub category: Option<String>,
}

impl SubmitFeedbackRequest {
    /// Decode a submission; the body must be a JSON object
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(ApiError::MalformedBody)?;
        if !value.is_object() {
            return Err(ApiError::MalformedBody(serde::de::Error::custom(
                "expected a JSON object",
            )));
        }
        serde_json::from_value(value).map_err(ApiError::MalformedBody)
    }

    pub fn validate(self) -> Result<NewFeedback, ApiError> {
        NewFeedback::new(self.user, self.text, self.category).ok_or(ApiError::TextRequired)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

/// Summary payload
///
/// `summary` carries either the model output or the failure text. `ok` tells
/// the two apart; older clients only read `summary`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryResponse {
    pub summary: String,
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `POST /api/feedback`
pub async fn submit_feedback(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let feedback = SubmitFeedbackRequest::parse(&body)?.validate()?;

    let id = state
        .store
        .insert(feedback)
        .await
        .map_err(ApiError::InsertFailed)?;
    info!("Stored feedback {}", id);

    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

/// `GET /api/feedbacks`
pub async fn list_feedback(
    State(state): State<AppState>,
) -> Result<Json<Vec<FeedbackRecord>>, ApiError> {
    let records = state
        .store
        .list_recent(LIST_LIMIT)
        .await
        .map_err(ApiError::ListFailed)?;
    debug!("Listing {} feedback records", records.len());

    Ok(Json(records))
}

/// `GET /api/summary`
///
/// Always answers 200. A store read failure yields a prompt with no feedback
/// lines; a summarizer failure is reported inside `summary` with `ok: false`.
pub async fn summarize_feedback(State(state): State<AppState>) -> Json<SummaryResponse> {
    let records = state
        .store
        .list_recent(SUMMARY_LIMIT)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to read feedback for summary: {}", e);
            Vec::new()
        });

    let prompt = build_summary_prompt(&records);
    debug!("Summarizing {} feedback records", records.len());

    let response = match state.summarizer.summarize(&prompt).await {
        Ok(summary) => SummaryResponse { summary, ok: true },
        Err(e) => {
            warn!("Summarizer failed: {}", e);
            SummaryResponse {
                summary: e.to_string(),
                ok: false,
            }
        }
    };

    Json(response)
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
