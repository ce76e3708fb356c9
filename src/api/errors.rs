//! Error conversion from handler failures to HTTP responses
//!
//! Each failure site has its own variant. The client-facing message is the
//! variant's Display text; the underlying cause is only logged.

use crate::error::FeedbackError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Error body returned to clients
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// Submission body was not a valid feedback object
    #[error("invalid input")]
    MalformedBody(#[source] serde_json::Error),

    /// Submission had no text
    #[error("text required")]
    TextRequired,

    /// Submission was valid but could not be stored
    #[error("invalid input")]
    InsertFailed(#[source] FeedbackError),

    /// Listing could not be read
    #[error("db")]
    ListFailed(#[source] FeedbackError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::TextRequired => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(_)
            | ApiError::InsertFailed(_)
            | ApiError::ListFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::MalformedBody(e) => warn!("Rejected feedback body: {}", e),
            ApiError::TextRequired => warn!("Rejected feedback without text"),
            ApiError::InsertFailed(e) => error!("Failed to store feedback: {}", e),
            ApiError::ListFailed(e) => error!("Failed to list feedback: {}", e),
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::TextRequired.status(), StatusCode::BAD_REQUEST);

        let db = || FeedbackError::Database("locked".to_string());
        assert_eq!(
            ApiError::InsertFailed(db()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ListFailed(db()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_messages_hide_detail() {
        let err = ApiError::InsertFailed(FeedbackError::Database("disk full".to_string()));
        assert_eq!(err.to_string(), "invalid input");

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ApiError::MalformedBody(parse).to_string(), "invalid input");
        assert_eq!(
            ApiError::ListFailed(FeedbackError::Database("x".to_string())).to_string(),
            "db"
        );
    }
}
