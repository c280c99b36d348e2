//! Agent endpoints — the three remote webhook agents the wizard talks to.
//!
//! ```text
//! Playbook phase ──► Playbook Agent   (chatInput, session_id)
//! Bpmn phase     ──► BPMN Agent       (chatInput, session_id)
//! Mermaid phase  ──► Mermaid Agent    (chatInput, session_id, user_message)
//! ```
//!
//! Every agent replies with `{"output": "<text>"}`.

pub mod client;

pub use client::{AgentClient, HttpAgentClient};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which remote agent a request is addressed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Playbook,
    Bpmn,
    Mermaid,
}

impl AgentKind {
    /// Environment variable holding this agent's webhook URL.
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Playbook => "PLAYBOOK_WEBHOOK_URL",
            Self::Bpmn => "BPMN_WEBHOOK_URL",
            Self::Mermaid => "MERMAID_WEBHOOK_URL",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Playbook => "Playbook",
            Self::Bpmn => "BPMN",
            Self::Mermaid => "Mermaid",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// JSON body posted to an agent webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentRequest {
    #[serde(rename = "chatInput")]
    pub input: String,
    pub session_id: String,
    /// Only sent to the Mermaid agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
}

impl AgentRequest {
    pub fn new(input: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            session_id: session_id.into(),
            user_message: None,
        }
    }

    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = Some(message.into());
        self
    }
}
