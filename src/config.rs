//! Layered configuration for the feedback service
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. An optional TOML file
//! 3. `FEEDBACK_<SECTION>__<KEY>` environment variables
//!
//! CLI flags are applied on top by the binary.

use crate::error::Result;
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "FEEDBACK";

/// Region variable consulted when no region is configured
pub const REGION_ENV_VAR: &str = "AWS_REGION";

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_STATIC_DIR: &str = "./frontend";
pub const DEFAULT_DB_PATH: &str = "feedback.db";
pub const DEFAULT_POOL_SIZE: usize = 8;
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Full service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub summarizer: SummarizerConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub addr: SocketAddr,
    /// Directory served for non-API paths
    pub static_dir: PathBuf,
}

/// SQLite store settings
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Database file path
    pub path: PathBuf,
    /// Maximum pooled connections
    pub pool_size: usize,
}

/// Hosted model settings
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    pub region: String,
    pub model_id: String,
    /// Generation length bound sent with every request
    pub max_tokens: u32,
    /// Overrides the regional endpoint (local mocks, VPC endpoints)
    #[serde(default)]
    pub endpoint_url: Option<String>,
    pub timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let region = env::var(REGION_ENV_VAR)
            .ok()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        debug!("Default summarizer region: {}", region);

        let mut builder = config::Config::builder()
            .set_default("server.addr", DEFAULT_ADDR)?
            .set_default("server.static_dir", DEFAULT_STATIC_DIR)?
            .set_default("store.path", DEFAULT_DB_PATH)?
            .set_default("store.pool_size", DEFAULT_POOL_SIZE as i64)?
            .set_default("summarizer.region", region)?
            .set_default("summarizer.model_id", DEFAULT_MODEL_ID)?
            .set_default("summarizer.max_tokens", DEFAULT_MAX_TOKENS as i64)?
            .set_default("summarizer.timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?;

        if let Some(path) = file {
            debug!("Loading configuration file: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: ([0, 0, 0, 0], 8080).into(),
                static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            },
            store: StoreConfig {
                path: PathBuf::from(DEFAULT_DB_PATH),
                pool_size: DEFAULT_POOL_SIZE,
            },
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            endpoint_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_defaults() {
        env::remove_var(REGION_ENV_VAR);
        let config = AppConfig::load(None).unwrap();

        assert_eq!(config.server.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.store.path, PathBuf::from("feedback.db"));
        assert_eq!(config.summarizer.region, "us-east-1");
        assert_eq!(config.summarizer.max_tokens, 300);
        assert!(config.summarizer.endpoint_url.is_none());
    }

    #[test]
    #[serial]
    fn test_region_from_environment() {
        env::set_var(REGION_ENV_VAR, "eu-west-3");
        let config = AppConfig::load(None).unwrap();
        env::remove_var(REGION_ENV_VAR);

        assert_eq!(config.summarizer.region, "eu-west-3");
    }

    #[test]
    #[serial]
    fn test_prefixed_env_overrides() {
        env::set_var("FEEDBACK_STORE__POOL_SIZE", "3");
        env::set_var("FEEDBACK_SERVER__ADDR", "127.0.0.1:9090");
        let config = AppConfig::load(None);
        env::remove_var("FEEDBACK_STORE__POOL_SIZE");
        env::remove_var("FEEDBACK_SERVER__ADDR");

        let config = config.unwrap();
        assert_eq!(config.store.pool_size, 3);
        assert_eq!(config.server.addr.port(), 9090);
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("feedback.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[store]\npath = \"/var/lib/feedback/data.db\"\n\n[summarizer]\nendpoint_url = \"http://localhost:4566\"\n"
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/var/lib/feedback/data.db"));
        assert_eq!(
            config.summarizer.endpoint_url.as_deref(),
            Some("http://localhost:4566")
        );
        assert_eq!(config.store.pool_size, DEFAULT_POOL_SIZE);
    }

    #[test]
    #[serial]
    fn test_missing_file_is_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/feedback.toml")));
        assert!(result.is_err());
    }
}
