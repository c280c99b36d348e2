//! SessionOrchestrator - phase machine for the three-step wizard.
//!
//! Every operation:
//!   1. Checks the phase table (`Phase::allows`)
//!   2. Validates its input before any network call
//!   3. Sends one request to the agent that owns the phase
//!   4. Applies the reply to the session, or leaves it untouched on failure
//!
//! | Phase    | Operation                  | Agent    | Next phase          |
//! |----------|----------------------------|----------|---------------------|
//! | Playbook | submit_playbook_message    | Playbook | Playbook            |
//! | Playbook | advance_to_bpmn            | BPMN     | Bpmn (on success)   |
//! | Bpmn     | submit_bpmn_message        | BPMN     | Bpmn                |
//! | Bpmn     | advance_to_mermaid         | Mermaid  | Mermaid (always)    |
//! | Mermaid  | ensure_diagram_initialized | Mermaid  | Mermaid             |
//! | Mermaid  | submit_mermaid_message     | Mermaid  | Mermaid             |
//! | Mermaid  | finalize_summary           | —        | Mermaid             |
//!
//! The orchestrator holds no session state of its own. Callers pass the
//! `Session` in and are responsible for not running two operations on the
//! same session at once (see `SessionStore`).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agent::{AgentClient, AgentKind, AgentRequest};
use crate::config::AgentEndpoints;
use crate::error::ServerError;
use crate::models::{Operation, Phase, Session};

/// Request text sent with every automatic first-diagram generation.
pub const FIRST_DIAGRAM_REQUEST: &str = "Generate the first version of the diagram from the BPMN.";

/// History entry recorded after the first diagram is generated.
pub const FIRST_DIAGRAM_STATUS: &str = "First diagram version generated.";

// ─── Outcomes ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
}

/// User-facing status message produced by an operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Result of a successful operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// `None` when the operation had nothing to do.
    pub notice: Option<Notice>,
    /// Whether the presentation layer should clear the message input.
    pub clear_input: bool,
}

impl Outcome {
    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            clear_input: false,
        }
    }

    fn noop() -> Self {
        Self {
            notice: None,
            clear_input: false,
        }
    }

    fn clearing_input(mut self) -> Self {
        self.clear_input = true;
        self
    }
}

// ─── Orchestrator ─────────────────────────────────────────────────────────

/// Applies user actions to a session by relaying them to the phase's agent.
#[derive(Clone)]
pub struct SessionOrchestrator {
    client: Arc<dyn AgentClient>,
    endpoints: AgentEndpoints,
}

impl SessionOrchestrator {
    pub fn new(client: Arc<dyn AgentClient>, endpoints: AgentEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &AgentEndpoints {
        &self.endpoints
    }

    /// Send the user's message to the Playbook agent.
    pub async fn submit_playbook_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<Outcome, ServerError> {
        ensure_phase(session, Operation::SubmitPlaybookMessage)?;
        require_text(text, "Type a message before sending it to the Playbook agent.")?;

        let request = AgentRequest::new(text, session.session_id.clone());
        let output = self.call(AgentKind::Playbook, &request).await?;

        session.playbook_history.push(output.clone());
        session.playbook_text = output;
        session.touch();

        Ok(
            Outcome::notice(Notice::success("Playbook agent reply received and stored."))
                .clearing_input(),
        )
    }

    /// Hand the finished playbook to the BPMN agent and enter the Bpmn phase.
    pub async fn advance_to_bpmn(&self, session: &mut Session) -> Result<Outcome, ServerError> {
        ensure_phase(session, Operation::AdvanceToBpmn)?;
        require_text(
            &session.playbook_text,
            "The playbook is empty. Add or revise content before sending it to the BPMN agent.",
        )?;

        let request = AgentRequest::new(session.playbook_text.clone(), session.session_id.clone());
        let output = self.call(AgentKind::Bpmn, &request).await?;

        session.bpmn_history.push(output.clone());
        session.bpmn_text = output;
        session.phase = Phase::Bpmn;
        session.touch();
        tracing::info!("[Orchestrator] Session {} entered the bpmn phase", session.session_id);

        Ok(Outcome::notice(Notice::success("BPMN flow returned by the BPMN agent.")))
    }

    /// Send an adjustment or question to the BPMN agent.
    pub async fn submit_bpmn_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<Outcome, ServerError> {
        ensure_phase(session, Operation::SubmitBpmnMessage)?;
        require_text(text, "Type a message before sending it to the BPMN agent.")?;

        let request = AgentRequest::new(text, session.session_id.clone());
        let output = self.call(AgentKind::Bpmn, &request).await?;

        session.bpmn_history.push(output.clone());
        session.bpmn_text = output;
        session.touch();

        Ok(Outcome::notice(Notice::success("BPMN flow updated.")))
    }

    /// Enter the Mermaid phase and request the first diagram.
    ///
    /// The phase changes before the diagram call is made. If the call fails
    /// the session stays in the Mermaid phase with `diagram_initialized`
    /// still false.
    pub async fn advance_to_mermaid(&self, session: &mut Session) -> Result<Outcome, ServerError> {
        ensure_phase(session, Operation::AdvanceToMermaid)?;
        require_text(
            &session.bpmn_text,
            "There is no BPMN text returned by the BPMN agent to generate the diagram from.",
        )?;

        session.phase = Phase::Mermaid;
        session.touch();
        tracing::info!("[Orchestrator] Session {} entered the mermaid phase", session.session_id);

        self.generate_first_diagram(session).await?;
        Ok(Outcome::notice(Notice::success(
            "The first version of the diagram was generated successfully.",
        )))
    }

    /// Generate the first diagram once per Mermaid phase.
    ///
    /// Marks the diagram as initialized after a single attempt, successful or
    /// not, so repeated view refreshes never re-trigger generation.
    pub async fn ensure_diagram_initialized(
        &self,
        session: &mut Session,
    ) -> Result<Outcome, ServerError> {
        ensure_phase(session, Operation::EnsureDiagramInitialized)?;
        if session.diagram_initialized {
            return Ok(Outcome::noop());
        }

        if session.bpmn_text.trim().is_empty() {
            session.diagram_initialized = true;
            session.touch();
            return Ok(Outcome::notice(Notice::info(
                "There is no BPMN text to generate a diagram from.",
            )));
        }

        let result = self.generate_first_diagram(session).await;
        session.diagram_initialized = true;
        session.touch();
        result?;

        Ok(Outcome::notice(Notice::success(
            "The first version of the diagram was generated successfully.",
        )))
    }

    /// Ask the Mermaid agent to revise the diagram.
    ///
    /// The full BPMN text is always resent alongside the request.
    pub async fn submit_mermaid_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<Outcome, ServerError> {
        ensure_phase(session, Operation::SubmitMermaidMessage)?;
        require_text(text, "Type a message before sending it to the Mermaid agent.")?;

        let request = AgentRequest::new(session.bpmn_text.clone(), session.session_id.clone())
            .with_user_message(text);
        let output = self.call(AgentKind::Mermaid, &request).await?;

        session.diagram_code = output;
        session
            .diagram_history
            .push(format!("Diagram updated per request: {}", text));
        session.touch();

        Ok(Outcome::notice(Notice::success("Diagram updated.")))
    }

    /// Compose the final document. Never mutates the session.
    pub fn finalize_summary(&self, session: &Session) -> Result<String, ServerError> {
        ensure_phase(session, Operation::FinalizeSummary)?;
        Ok(compose_summary(session))
    }

    async fn generate_first_diagram(&self, session: &mut Session) -> Result<(), ServerError> {
        let request = AgentRequest::new(session.bpmn_text.clone(), session.session_id.clone())
            .with_user_message(FIRST_DIAGRAM_REQUEST);
        let output = self.call(AgentKind::Mermaid, &request).await?;

        session.diagram_code = output;
        session.diagram_history.push(FIRST_DIAGRAM_STATUS.to_string());
        session.diagram_initialized = true;
        Ok(())
    }

    async fn call(&self, kind: AgentKind, request: &AgentRequest) -> Result<String, ServerError> {
        self.client
            .call_agent(kind, self.endpoints.url(kind), request)
            .await
            .map_err(|e| {
                tracing::warn!(
                    "[Orchestrator] {} agent call failed for session {}: {}",
                    kind,
                    request.session_id,
                    e
                );
                ServerError::Agent(e)
            })
    }
}

fn ensure_phase(session: &Session, operation: Operation) -> Result<(), ServerError> {
    if session.phase.allows(operation) {
        Ok(())
    } else {
        Err(ServerError::InvalidPhase {
            operation,
            phase: session.phase,
        })
    }
}

fn require_text(text: &str, message: &str) -> Result<(), ServerError> {
    if text.trim().is_empty() {
        Err(ServerError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

/// Markdown document holding the final playbook, BPMN text and diagram.
pub fn compose_summary(session: &Session) -> String {
    format!(
        "#### Final Playbook:\n{}\n\n#### Final BPMN Content:\n{}\n\n#### Mermaid Diagram:\n```mermaid\n{}\n```",
        session.playbook_text, session.bpmn_text, session.diagram_code
    )
}
