//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command and reuses
//! the playbooker-core domain logic through `AppState`.

pub mod server;
pub mod wizard;

use std::sync::Arc;

use playbooker_core::config::AgentEndpoints;
use playbooker_core::state::{AppState, AppStateInner};

/// Initialize a shared `AppState` talking to the given agent endpoints.
///
/// This mirrors `playbooker_server::create_app_state` but avoids starting
/// the HTTP server for the interactive wizard.
pub fn init_state(endpoints: AgentEndpoints) -> AppState {
    let status = endpoints.status();
    if !(status.playbook && status.bpmn && status.mermaid) {
        eprintln!(
            "Warning: not all agent webhooks are configured (playbook: {}, bpmn: {}, mermaid: {}).",
            status.playbook, status.bpmn, status.mermaid
        );
    }
    Arc::new(AppStateInner::new(endpoints))
}
