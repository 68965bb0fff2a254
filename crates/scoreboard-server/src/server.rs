use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, put};
use axum::Router;
use scoreboard_core::AdminToken;
use scoreboard_settings::ServerSettings;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::scoreboard::LiveScoreboard;
use crate::sse;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub keep_alive: Duration,
    pub subscriber_queue: usize,
    pub admin_token: Option<AdminToken>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            keep_alive: Duration::from_secs(30),
            subscriber_queue: 64,
            admin_token: None,
        }
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(s: &ServerSettings) -> Self {
        Self {
            host: s.host.clone(),
            port: s.port,
            keep_alive: Duration::from_secs(s.keep_alive_secs.max(1)),
            subscriber_queue: s.subscriber_queue,
            admin_token: s.admin_token(),
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub scoreboard: Arc<LiveScoreboard>,
    pub admin_token: Option<AdminToken>,
    pub keep_alive: Duration,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::banner))
        .route("/health", get(handlers::health))
        .route(
            "/matches",
            get(handlers::list_matches).post(handlers::create_match),
        )
        .route(
            "/matches/{id}",
            put(handlers::update_match).delete(handlers::delete_match),
        )
        .route("/events", get(sse::events_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Create and start the server with an empty in-memory board.
pub async fn start(config: ServerConfig) -> Result<ServerHandle, std::io::Error> {
    let scoreboard = Arc::new(LiveScoreboard::in_memory(config.subscriber_queue));
    start_with_scoreboard(config, scoreboard).await
}

/// Start the server around an existing board.
pub async fn start_with_scoreboard(
    config: ServerConfig,
    scoreboard: Arc<LiveScoreboard>,
) -> Result<ServerHandle, std::io::Error> {
    if config.admin_token.is_none() {
        tracing::warn!("No admin token configured; mutating endpoints are open");
    }

    let state = AppState {
        scoreboard: Arc::clone(&scoreboard),
        admin_token: config.admin_token.clone(),
        keep_alive: config.keep_alive,
    };

    let router = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), host = %config.host, "Score board server started");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Server exited with error");
        }
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        scoreboard,
        server,
    })
}

/// Handle returned by `start()`; aborts the server when dropped.
pub struct ServerHandle {
    pub port: u16,
    pub scoreboard: Arc<LiveScoreboard>,
    server: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Wait until the server task ends.
    pub async fn join(mut self) {
        let _ = (&mut self.server).await;
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.server.abort();
    }
}
