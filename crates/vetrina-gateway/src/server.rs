// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use vetrina_core::VetrinaError;
use vetrina_pipeline::{TryOnPipeline, MAX_CAPTURE_BYTES};
use vetrina_storage::Database;

use crate::handlers;

/// Rate-limit settings for the public session-minting endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub window_secs: u64,
    pub max_requests: u32,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The try-on orchestrator.
    pub pipeline: TryOnPipeline,
    /// Database handle for reads the gateway performs itself (catalog,
    /// rate-limit counters).
    pub db: Database,
    /// Public base URL of this deployment, used to build try-on links.
    pub public_url: String,
    /// Session-minting rate limit.
    pub rate_limit: RateLimitSettings,
}

/// Gateway server configuration (mirrors ServerConfig from vetrina-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router over shared state.
///
/// Separate from [`start_server`] so tests can drive the router in-process
/// without binding a socket.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/tryon", post(handlers::post_try_on))
        .route("/v1/sessions", post(handlers::post_sessions))
        .route("/v1/stores/{slug}/products", get(handlers::get_store_products))
        // Multipart bodies carry the capture; cap slightly above the
        // pipeline's own limit so oversized captures get its 400, not a
        // generic 413 for the form overhead.
        .layer(DefaultBodyLimit::max(MAX_CAPTURE_BYTES + 64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), VetrinaError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VetrinaError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| VetrinaError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
