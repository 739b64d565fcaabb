//! HTTP surface: upload, preview, delete, and question answering over CSV files

pub mod routes;
pub mod state;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Owns the bind address and the shared state handed to every handler
pub struct RagServer {
    addr: String,
    state: AppState,
}

impl RagServer {
    /// Build providers from `config` and wrap them in fresh state
    pub async fn new(config: RagConfig) -> Result<Self> {
        let state = AppState::new(config).await?;
        Ok(Self::from_state(state))
    }

    /// Serve prepared state, e.g. state built around stub providers
    pub fn from_state(state: AppState) -> Self {
        let server = &state.config().server;
        Self {
            addr: format!("{}:{}", server.host, server.port),
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn address(&self) -> &str {
        &self.addr
    }

    /// Serve until Ctrl-C
    ///
    /// `/ready` reports 503 while in-flight requests drain.
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .addr
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address {}: {}", self.addr, e)))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind {}: {}", addr, e)))?;
        tracing::info!("csv-rag listening on http://{}", addr);

        let draining = self.state.clone();
        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Shutdown requested, draining in-flight requests");
                    draining.set_ready(false);
                }
            })
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))
    }
}

/// Router over `state` with tracing, gzip, and permissive CORS
pub fn build_router(state: AppState) -> Router {
    let max_upload_size = state.config().server.max_upload_size;

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/ready", get(readiness))
        .nest("/api", routes::api_routes(max_upload_size))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
