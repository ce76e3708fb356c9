//! Services layer for the feedback system
//!
//! Provides prompt construction and the hosted-model summarizer.

pub mod prompt;
pub mod sigv4;
pub mod summarizer;

pub use prompt::build_summary_prompt;
pub use sigv4::AwsCredentials;
pub use summarizer::{BedrockSummarizer, Summarizer, SummarizerError};
