//! HTTP server implementation using Axum.

use crate::handler::{
    handle_close, handle_fallback, handle_health, handle_launch, handle_method_not_allowed,
    handle_preflight, handle_status, Messages,
};
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use game_launcher_core::{LauncherConfig, ProcessController};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Accept-Charset";

/// Application state shared across handlers.
pub struct AppState {
    /// Owner of the managed process handle
    pub controller: Arc<ProcessController>,
    /// Response messages for the configured game
    pub messages: Messages,
}

impl AppState {
    pub fn new(config: &LauncherConfig) -> Self {
        Self::with_controller(ProcessController::new(config), config.game_name.clone())
    }

    /// Build state around an existing controller, e.g. one with a custom launcher.
    pub fn with_controller(controller: ProcessController, game_name: impl Into<String>) -> Self {
        Self {
            controller: Arc::new(controller),
            messages: Messages::new(game_name),
        }
    }
}

/// Build the router with all routes and the CORS header layers.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Fixed CORS headers on every response, preflight or not.
    let cors = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ));

    Router::new()
        .route(
            "/health",
            get(handle_health)
                .options(handle_preflight)
                .fallback(handle_method_not_allowed),
        )
        .route(
            "/launch",
            post(handle_launch)
                .options(handle_preflight)
                .fallback(handle_method_not_allowed),
        )
        .route(
            "/close",
            post(handle_close)
                .options(handle_preflight)
                .fallback(handle_method_not_allowed),
        )
        .route(
            "/status",
            get(handle_status)
                .options(handle_preflight)
                .fallback(handle_method_not_allowed),
        )
        .fallback(handle_fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let app = build_router(state);

    // Parse the address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    // Bind to the address
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    // Spawn the server in the background
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
