//! HTTP server for document chat

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::DocChatConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Document chat HTTP server
pub struct DocChatServer {
    config: DocChatConfig,
    state: AppState,
}

impl DocChatServer {
    /// Create a server backed by the Gemini API
    pub fn new(config: DocChatConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create a server around existing state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config().clone(),
            state,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let router = Router::new()
            // Health check
            .route("/health", get(health_check))
            .nest("/api", routes::api_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            // Middleware layers (order matters - applied bottom to top)
            .layer(RequestBodyLimitLayer::new(self.config.server.max_upload_size))
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        if let Some(secs) = self.config.server.session_idle_timeout_secs {
            tracing::info!("Sessions expire after {}s of inactivity", secs);
            self.state.spawn_expiry_sweep(Duration::from_secs(secs));
        }

        tracing::info!("Starting document chat server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        self.config.server.address()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
