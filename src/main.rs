//! Feedback Hub - HTTP service entry point

use clap::Parser;
use feedback_core::{
    api::{ApiServer, AppState},
    AppConfig, BedrockSummarizer, SqliteFeedbackStore,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feedback-hub", version, about = "Feedback collection service with LLM summaries")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Database path (overrides config)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Static asset directory (overrides config)
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Set log level
    #[arg(short, long, default_value = "info", env = "FEEDBACK_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let level = level.as_str().to_lowercase();
    let filter = EnvFilter::new(format!(
        "feedback_hub={level},feedback_core={level},tower_http={level}"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Feedback Hub v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }
    if let Some(db_path) = cli.db_path {
        config.store.path = db_path;
    }
    if let Some(static_dir) = cli.static_dir {
        config.server.static_dir = static_dir;
    }

    let store = SqliteFeedbackStore::open(&config.store).await?;

    let summarizer = BedrockSummarizer::new(&config.summarizer)?;
    info!(
        "Summaries via model {} in {}",
        config.summarizer.model_id, config.summarizer.region
    );

    let state = AppState::new(Arc::new(store), Arc::new(summarizer));
    ApiServer::new(config.server, state).serve().await
}
