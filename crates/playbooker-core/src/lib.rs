//! Playbooker Core — Transport-agnostic domain logic for the playbook wizard.
//!
//! A session moves through three phases, each backed by a remote webhook
//! agent:
//!
//! ```text
//! Playbook ──advance_to_bpmn──► Bpmn ──advance_to_mermaid──► Mermaid
//!    │                            │                             │
//! Playbook Agent              BPMN Agent                  Mermaid Agent
//! ```
//!
//! This crate has **no HTTP framework dependency** by default, making it
//! suitable for use in:
//!
//! - HTTP servers (via `playbooker-server`)
//! - CLI tools (via `playbooker-cli`)
//!
//! # Feature Flags
//!
//! - `axum` — Enables `IntoResponse` impl on `ServerError` for use in axum handlers.

pub mod agent;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestration;
pub mod state;
pub mod store;

// Convenience re-exports
pub use agent::{AgentClient, AgentKind, AgentRequest, HttpAgentClient};
pub use config::AgentEndpoints;
pub use error::{AgentError, ServerError};
pub use models::{Operation, Phase, Session, SessionView};
pub use orchestration::{Notice, NoticeLevel, Outcome, SessionOrchestrator};
pub use state::{AppState, AppStateInner};
