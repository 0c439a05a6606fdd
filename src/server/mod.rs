//! HTTP server for the push relay
//!
//! Exposes token management for app clients, direct sends for operators and
//! the webhook the tracking server posts events to.

mod auth;
pub mod routes;
pub mod state;

pub use auth::AuthLayer;
pub use state::ServerAppState;

use crate::config::ServerConfig;
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Json, Router,
};
use routes::{notification_routes, token_routes, webhook_routes};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Version information for the server
#[derive(serde::Serialize)]
struct VersionInfo {
    version: String,
}

/// Build the router with all routes and layers applied
pub fn build_router(
    state: ServerAppState,
    api_token: Option<String>,
    cors_origins: &[String],
) -> Router {
    // Explicit headers instead of Any: browsers reject a wildcard together
    // with the Authorization header
    let cors = if cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
    } else {
        let allowed_origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
    };

    let mut app = Router::new()
        .route(
            "/api/tokens",
            post(token_routes::register_token_handler)
                .delete(token_routes::remove_token_handler),
        )
        .route("/api/tokens/:email", get(token_routes::list_tokens_handler))
        .route(
            "/api/notifications",
            post(notification_routes::send_notification_handler),
        )
        .route("/api/echo", post(notification_routes::echo_handler))
        .route(
            "/webhooks/tracking",
            post(webhook_routes::tracking_webhook_handler),
        )
        .route("/api/version", get(version_handler))
        .route("/health", get(health_handler));

    // Layer order: cors (outer) -> auth -> handler
    if let Some(token) = api_token {
        app = app.layer(AuthLayer::new(token));
    }

    app.layer(cors).with_state(state)
}

/// Run the HTTP server until shutdown is requested
pub async fn run_server(config: &ServerConfig, state: ServerAppState) -> Result<(), String> {
    if config.api_token.is_none() {
        log::warn!("No API token configured; /api routes are unauthenticated");
    }

    let app = build_router(state.clone(), config.api_token.clone(), &config.cors_origins);

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Server listening on http://{}", addr);
    log::info!("Token store: {}", state.store.path().display());

    let shutdown_state = state.shutdown_state.clone();
    let shutdown_signal = async move {
        loop {
            if shutdown_state.is_shutdown_requested() {
                log::info!("Shutdown signal received, stopping server...");
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Version endpoint
async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
