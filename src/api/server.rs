//! HTTP API server

use super::{
    handlers::{health, list_feedback, submit_feedback, summarize_feedback},
    state::AppState,
};
use crate::config::ServerConfig;
use axum::{
    routing::{get, post},
    Router,
};
use std::{future::Future, path::Path};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

/// API server
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create new API server
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Router for this server's state and static directory
    pub fn router(&self) -> Router {
        Self::build_router(self.state.clone(), &self.config.static_dir)
    }

    /// Build router
    ///
    /// Paths outside the API are served from `static_dir`; missing files
    /// answer 404.
    pub fn build_router(state: AppState, static_dir: &Path) -> Router {
        Router::new()
            .route("/api/feedback", post(submit_feedback))
            .route("/api/feedbacks", get(list_feedback))
            .route("/api/summary", get(summarize_feedback))
            .route("/health", get(health))
            .fallback_service(ServeDir::new(static_dir))
            .with_state(state)
            // Middleware
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until SIGINT/SIGTERM
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.addr).await?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on an existing listener until `shutdown` resolves
    ///
    /// In-flight requests are drained before returning.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!("Server running on http://{}", addr);
        info!(
            "Serving static assets from {}",
            self.config.static_dir.display()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server shut down complete");
        Ok(())
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
