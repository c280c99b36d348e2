//! Shared application state for the HTTP server and the CLI.

use std::sync::Arc;

use crate::agent::{AgentClient, HttpAgentClient};
use crate::config::AgentEndpoints;
use crate::orchestration::SessionOrchestrator;
use crate::store::SessionStore;

/// Shared state accessible by all API handlers.
pub struct AppStateInner {
    pub sessions: SessionStore,
    pub orchestrator: SessionOrchestrator,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    /// State backed by the HTTP agent client.
    pub fn new(endpoints: AgentEndpoints) -> Self {
        Self::with_client(Arc::new(HttpAgentClient::new()), endpoints)
    }

    pub fn with_client(client: Arc<dyn AgentClient>, endpoints: AgentEndpoints) -> Self {
        Self {
            sessions: SessionStore::new(),
            orchestrator: SessionOrchestrator::new(client, endpoints),
        }
    }
}
