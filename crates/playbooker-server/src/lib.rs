//! Playbooker Server - HTTP backend for the playbook wizard.
//!
//! A standalone Rust backend exposing wizard sessions over a JSON REST API
//! via axum. Any presentation layer (web page, desktop shell, script) drives
//! the three phases through these endpoints and renders the returned views.
//!
//! This crate can be used standalone or embedded in other applications
//! (e.g. the `playbooker server` CLI command).

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use playbooker_core::config::AgentEndpoints;
use playbooker_core::state::{AppState, AppStateInner};

/// Configuration for the Playbooker backend server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Webhook URLs of the three agents.
    pub endpoints: AgentEndpoints,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3210,
            endpoints: AgentEndpoints::from_env(),
        }
    }
}

/// Create a shared `AppState` talking to the given agent endpoints.
///
/// This is useful when you need to share the state between the HTTP server
/// and other consumers (e.g. tests driving the store directly).
pub fn create_app_state(endpoints: AgentEndpoints) -> AppState {
    let status = endpoints.status();
    if !(status.playbook && status.bpmn && status.mermaid) {
        tracing::warn!(
            "Some agent endpoints are not configured (playbook: {}, bpmn: {}, mermaid: {})",
            status.playbook,
            status.bpmn,
            status.mermaid
        );
    }
    Arc::new(AppStateInner::new(endpoints))
}

/// Start the Playbooker backend server.
///
/// Returns the actual address the server is listening on.
pub async fn start_server(config: ServerConfig) -> Result<SocketAddr, String> {
    // Initialize tracing (a no-op if the embedding binary already did)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playbooker_server=info,playbooker_core=info,tower_http=info".into()),
        )
        .try_init();

    tracing::info!(
        "Starting Playbooker backend server on {}:{}",
        config.host,
        config.port
    );

    let state = create_app_state(config.endpoints.clone());

    start_server_with_state(config, state).await
}

/// Start the HTTP server with a pre-built `AppState`.
pub async fn start_server_with_state(
    config: ServerConfig,
    state: AppState,
) -> Result<SocketAddr, String> {
    let app = build_router(state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local address: {}", e))?;

    tracing::info!("Playbooker backend server listening on {}", local_addr);

    // Spawn the server in a background task
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}

/// Build the full router (API + health check) over `state`.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::api_router())
        .route("/api/health", axum::routing::get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "server": "playbooker-server",
        "version": env!("CARGO_PKG_VERSION"),
        "agents": state.orchestrator.endpoints().status(),
    }))
}
