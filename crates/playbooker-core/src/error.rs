//! Core error types for Playbooker.
//!
//! `AgentError` describes a single failed call to a remote agent endpoint.
//! `ServerError` is used throughout the core domain (orchestrator, store).
//! When the `axum` feature is enabled, it also implements `IntoResponse`
//! so it can be used directly as an axum handler error type.

use crate::models::{Operation, Phase};

/// Failure of one agent call. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// Endpoint URL is unset or empty; no request was attempted.
    #[error("{0} is not configured")]
    Config(String),

    #[error("HTTP request failed: {message}")]
    Transport { message: String },

    #[error("Unexpected agent response: {0}")]
    Protocol(String),

    /// Agent answered with a non-200 status.
    #[error("Agent returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation '{operation}' is not available in the {phase} phase")]
    InvalidPhase { operation: Operation, phase: Phase },

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl ServerError {
    /// Stable machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Validation(_) => "validation",
            ServerError::NotFound(_) => "not_found",
            ServerError::InvalidPhase { .. } => "invalid_phase",
            ServerError::Agent(AgentError::Config(_)) => "config",
            ServerError::Agent(AgentError::Transport { .. }) => "transport",
            ServerError::Agent(AgentError::Protocol(_)) => "protocol",
            ServerError::Agent(AgentError::Status { .. }) => "agent",
        }
    }
}

// ---------------------------------------------------------------------------
// axum integration (opt-in via feature flag)
// ---------------------------------------------------------------------------

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidPhase { .. } => StatusCode::CONFLICT,
            ServerError::Agent(AgentError::Config(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Agent(_) => StatusCode::BAD_GATEWAY,
        };

        let body = serde_json::json!({ "error": self.to_string(), "kind": self.kind() });
        (status, axum::Json(body)).into_response()
    }
}
