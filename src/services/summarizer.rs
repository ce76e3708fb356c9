//! Summarizer client for the hosted language model
//!
//! [`Summarizer`] turns a prompt into model output. Failures come back as a
//! tagged [`SummarizerError`] rather than a pre-formatted string; the HTTP
//! layer decides how to present them.

use crate::config::SummarizerConfig;
use crate::error::{FeedbackError, Result};
use crate::services::sigv4::{self, AwsCredentials, SigningParams};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Provider name used in error messages
pub const PROVIDER: &str = "Bedrock";

/// Service name in the SigV4 credential scope
const SIGNING_SERVICE: &str = "bedrock";

/// Prepended to every prompt before it is sent to the model
const PAYLOAD_PREAMBLE: &str = "Summarize the following feedbacks into main themes:\n";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Why a summary could not be produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizerError {
    /// The model service answered with an error
    #[error("Error from {provider}: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// The call never produced a service answer (credentials, transport, timeout)
    #[error("Exception: {0}")]
    Exception(String),
}

/// Prompt-to-text adapter over a hosted model
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Run one inference call and return the model's text output
    async fn summarize(&self, prompt: &str) -> std::result::Result<String, SummarizerError>;
}

/// Text-completion payload understood by the model
#[derive(Debug, Serialize)]
struct InvokeRequest {
    prompt: String,
    max_tokens_to_sample: u32,
}

/// Service error body
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Bedrock runtime `InvokeModel` client
pub struct BedrockSummarizer {
    client: Client,
    region: String,
    model_id: String,
    max_tokens: u32,
    endpoint: String,
    credentials: Option<AwsCredentials>,
}

impl BedrockSummarizer {
    /// Create a client from configuration
    ///
    /// Credentials are read from the environment on every call unless set with
    /// [`BedrockSummarizer::with_credentials`].
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FeedbackError::Http)?;

        let endpoint = config
            .endpoint_url
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", config.region));

        debug!(
            "Summarizer targeting {} (model: {}, region: {})",
            endpoint, config.model_id, config.region
        );

        Ok(Self {
            client,
            region: config.region.clone(),
            model_id: config.model_id.clone(),
            max_tokens: config.max_tokens,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    /// Use fixed credentials instead of the ambient environment
    pub fn with_credentials(mut self, credentials: AwsCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Full `InvokeModel` URL for the configured model
    pub fn invoke_url(&self) -> std::result::Result<Url, SummarizerError> {
        let raw = format!(
            "{}/model/{}/invoke",
            self.endpoint,
            sigv4::uri_encode(&self.model_id, true)
        );
        Url::parse(&raw)
            .map_err(|e| SummarizerError::Exception(format!("invalid endpoint '{}': {}", raw, e)))
    }

    fn request_body(&self, prompt: &str) -> std::result::Result<Vec<u8>, SummarizerError> {
        serde_json::to_vec(&InvokeRequest {
            prompt: format!("{}{}", PAYLOAD_PREAMBLE, prompt),
            max_tokens_to_sample: self.max_tokens,
        })
        .map_err(|e| SummarizerError::Exception(e.to_string()))
    }

    fn provider_error(status: StatusCode, body: &str) -> SummarizerError {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("{}: {}", status, body.trim()));

        SummarizerError::Provider {
            provider: PROVIDER,
            message,
        }
    }
}

#[async_trait]
impl Summarizer for BedrockSummarizer {
    async fn summarize(&self, prompt: &str) -> std::result::Result<String, SummarizerError> {
        let credentials = self
            .credentials
            .clone()
            .or_else(AwsCredentials::from_env)
            .ok_or_else(|| {
                SummarizerError::Exception("no AWS credentials found in environment".to_string())
            })?;

        let url = self.invoke_url()?;
        let body = self.request_body(prompt)?;

        let signing = SigningParams {
            credentials: &credentials,
            region: &self.region,
            service: SIGNING_SERVICE,
            time: Utc::now(),
        };
        let signed_headers = sigv4::sign_request(
            &signing,
            "POST",
            &url,
            &[("content-type", JSON_CONTENT_TYPE)],
            &body,
        )
        .map_err(|e| SummarizerError::Exception(e.to_string()))?;

        debug!("Invoking model {} ({} byte payload)", self.model_id, body.len());

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .body(body);
        for (name, value) in signed_headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Model request failed: {}", e);
            SummarizerError::Exception(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SummarizerError::Exception(e.to_string()))?;

        if !status.is_success() {
            warn!("Model returned status {}", status);
            return Err(Self::provider_error(status, &text));
        }

        debug!("Model returned {} bytes", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarizer() -> BedrockSummarizer {
        BedrockSummarizer::new(&SummarizerConfig::default()).unwrap()
    }

    #[test]
    fn test_error_display_formats() {
        let provider = SummarizerError::Provider {
            provider: PROVIDER,
            message: "throttled".to_string(),
        };
        assert_eq!(provider.to_string(), "Error from Bedrock: throttled");

        let exception = SummarizerError::Exception("connection refused".to_string());
        assert_eq!(exception.to_string(), "Exception: connection refused");
    }

    #[test]
    fn test_default_invoke_url() {
        let url = summarizer().invoke_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://bedrock-runtime.us-east-1.amazonaws.com/model/anthropic.claude-3-sonnet-20240229-v1%3A0/invoke"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let config = SummarizerConfig {
            endpoint_url: Some("http://localhost:4566/".to_string()),
            model_id: "test-model".to_string(),
            ..SummarizerConfig::default()
        };
        let url = BedrockSummarizer::new(&config).unwrap().invoke_url().unwrap();
        assert_eq!(url.as_str(), "http://localhost:4566/model/test-model/invoke");
    }

    #[test]
    fn test_request_body() {
        let body = summarizer().request_body("- great app\n").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            value["prompt"],
            "Summarize the following feedbacks into main themes:\n- great app\n"
        );
        assert_eq!(value["max_tokens_to_sample"], 300);
    }

    #[test]
    fn test_provider_error_message_extraction() {
        let err = BedrockSummarizer::provider_error(
            StatusCode::FORBIDDEN,
            r#"{"Message":"The security token included in the request is invalid."}"#,
        );
        assert_eq!(
            err.to_string(),
            "Error from Bedrock: The security token included in the request is invalid."
        );

        let err = BedrockSummarizer::provider_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "Error from Bedrock: 502 Bad Gateway: upstream down");
    }
}
