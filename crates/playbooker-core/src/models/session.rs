use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{Operation, Phase};

/// All state for one wizard run.
///
/// Fields are only mutated by the orchestrator; everything outside the crate
/// reads through accessors or [`Session::view`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub(crate) session_id: String,
    pub(crate) phase: Phase,
    pub(crate) playbook_text: String,
    pub(crate) bpmn_text: String,
    pub(crate) diagram_code: String,
    pub(crate) playbook_history: Vec<String>,
    pub(crate) bpmn_history: Vec<String>,
    pub(crate) diagram_history: Vec<String>,
    pub(crate) diagram_initialized: bool,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Session {
    /// Start a fresh session with a generated id.
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            phase: Phase::Playbook,
            playbook_text: String::new(),
            bpmn_text: String::new(),
            diagram_code: String::new(),
            playbook_history: Vec::new(),
            bpmn_history: Vec::new(),
            diagram_history: Vec::new(),
            diagram_initialized: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn playbook_text(&self) -> &str {
        &self.playbook_text
    }

    pub fn bpmn_text(&self) -> &str {
        &self.bpmn_text
    }

    pub fn diagram_code(&self) -> &str {
        &self.diagram_code
    }

    pub fn playbook_history(&self) -> &[String] {
        &self.playbook_history
    }

    pub fn bpmn_history(&self) -> &[String] {
        &self.bpmn_history
    }

    pub fn diagram_history(&self) -> &[String] {
        &self.diagram_history
    }

    pub fn diagram_initialized(&self) -> bool {
        self.diagram_initialized
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// History of whichever phase is current.
    pub fn current_history(&self) -> &[String] {
        match self.phase {
            Phase::Playbook => &self.playbook_history,
            Phase::Bpmn => &self.bpmn_history,
            Phase::Mermaid => &self.diagram_history,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            phase: self.phase,
            allowed_operations: self.phase.allowed_operations(),
            playbook_text: self.playbook_text.clone(),
            bpmn_text: self.bpmn_text.clone(),
            diagram_code: self.diagram_code.clone(),
            playbook_history: self.playbook_history.clone(),
            bpmn_history: self.bpmn_history.clone(),
            diagram_history: self.diagram_history.clone(),
            diagram_initialized: self.diagram_initialized,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            phase: self.phase,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: String,
    pub phase: Phase,
    pub allowed_operations: Vec<Operation>,
    pub playbook_text: String,
    pub bpmn_text: String,
    pub diagram_code: String,
    pub playbook_history: Vec<String>,
    pub bpmn_history: Vec<String>,
    pub diagram_history: Vec<String>,
    pub diagram_initialized: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row used when listing sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub phase: Phase,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_empty_in_playbook_phase() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Playbook);
        assert!(uuid::Uuid::parse_str(session.session_id()).is_ok());
        assert!(session.playbook_text().is_empty());
        assert!(session.current_history().is_empty());
        assert!(!session.diagram_initialized());
    }

    #[test]
    fn sessions_get_distinct_ids() {
        assert_ne!(Session::new().session_id(), Session::new().session_id());
    }

    #[test]
    fn view_uses_camel_case_and_lists_allowed_operations() {
        let view = serde_json::to_value(Session::with_id("abc").view()).unwrap();
        assert_eq!(view["sessionId"], "abc");
        assert_eq!(view["phase"], "playbook");
        assert_eq!(view["diagramInitialized"], false);
        assert_eq!(
            view["allowedOperations"],
            serde_json::json!(["submitPlaybookMessage", "advanceToBpmn"])
        );
    }
}
