//! `playbooker wizard` — Interactive three-phase wizard.
//!
//! Creates a session and provides a REPL-style interface: plain lines go
//! to the agent of the current phase, slash commands move the wizard
//! forward or export the result.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use playbooker_core::models::{Phase, Session};
use playbooker_core::orchestration::{NoticeLevel, Outcome};
use playbooker_core::state::AppState;
use playbooker_core::ServerError;

/// One parsed line of wizard input.
#[derive(Debug, PartialEq, Eq)]
enum WizardCommand<'a> {
    Empty,
    Quit,
    Help,
    Next,
    Status,
    Summary,
    Export(&'a str),
    Message(&'a str),
    Unknown(&'a str),
}

fn parse_command(line: &str) -> WizardCommand<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return WizardCommand::Empty;
    }
    if !trimmed.starts_with('/') {
        return WizardCommand::Message(line);
    }

    let (command, arg) = trimmed
        .split_once(char::is_whitespace)
        .map(|(c, a)| (c, a.trim()))
        .unwrap_or((trimmed, ""));
    match command {
        "/quit" | "/exit" | "/q" => WizardCommand::Quit,
        "/help" | "/?" => WizardCommand::Help,
        "/next" => WizardCommand::Next,
        "/status" => WizardCommand::Status,
        "/summary" => WizardCommand::Summary,
        "/export" => WizardCommand::Export(arg),
        other => WizardCommand::Unknown(other),
    }
}

impl WizardCommand<'_> {
    /// Whether the Mermaid view is refreshed before handling this command.
    fn refreshes_view(&self) -> bool {
        !matches!(self, WizardCommand::Quit | WizardCommand::Help)
    }
}

pub async fn run(state: &AppState) -> Result<(), String> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with_io(state, stdin.lock(), &mut stdout).await
}

/// Drive one wizard session from `input`, writing everything to `out`.
pub async fn run_with_io<R: BufRead, W: Write>(
    state: &AppState,
    input: R,
    out: &mut W,
) -> Result<(), String> {
    let created = state.sessions.create().await;
    let session_id = created.session_id().to_string();
    let handle = state
        .sessions
        .get(&session_id)
        .await
        .map_err(|e| e.to_string())?;

    say(out, "Playbooker Wizard")?;
    say(out, "══════════════════════════════════════")?;
    say(out, format!("Session ID: {}", session_id))?;
    say(out, "══════════════════════════════════════")?;
    say(out, "Type your message and press Enter. Type /help for commands.")?;
    print_phase_header(out, created.phase())?;
    prompt(out)?;

    for line in input.lines() {
        let line = line.map_err(|e| format!("Failed to read input: {}", e))?;
        let command = parse_command(&line);
        let mut session = handle.lock().await;

        if command.refreshes_view()
            && session.phase() == Phase::Mermaid
            && !session.diagram_initialized()
        {
            let result = state.orchestrator.ensure_diagram_initialized(&mut session).await;
            report(out, result)?;
            render_latest(out, &session)?;
        }

        match command {
            WizardCommand::Empty => {}
            WizardCommand::Quit => {
                drop(session);
                state.sessions.delete(&session_id).await.ok();
                say(out, "Goodbye!")?;
                return Ok(());
            }
            WizardCommand::Help => print_help(out)?,
            WizardCommand::Status => {
                let view = serde_json::to_string_pretty(&session.view())
                    .map_err(|e| format!("Failed to render session: {}", e))?;
                say(out, view)?;
            }
            WizardCommand::Summary => match state.orchestrator.finalize_summary(&session) {
                Ok(summary) => {
                    say(out, "### Final Playbook, BPMN and Diagram:")?;
                    say(out, summary)?;
                }
                Err(e) => report_error(out, &e)?,
            },
            WizardCommand::Export(path) => {
                if path.is_empty() {
                    say(out, "Usage: /export <path>")?;
                } else {
                    match state.orchestrator.finalize_summary(&session) {
                        Ok(summary) => {
                            std::fs::write(path, summary)
                                .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
                            say(out, format!("✓ Final document written to {}", path))?;
                        }
                        Err(e) => report_error(out, &e)?,
                    }
                }
            }
            WizardCommand::Next => {
                let before = session.phase();
                let result = match before {
                    Phase::Playbook => state.orchestrator.advance_to_bpmn(&mut session).await,
                    Phase::Bpmn => state.orchestrator.advance_to_mermaid(&mut session).await,
                    Phase::Mermaid => {
                        say(out, "Already in the final phase. Use /summary or /export <path>.")?;
                        Ok(Outcome {
                            notice: None,
                            clear_input: false,
                        })
                    }
                };
                report(out, result)?;
                if session.phase() != before {
                    print_phase_header(out, session.phase())?;
                    render_latest(out, &session)?;
                }
            }
            WizardCommand::Message(text) => {
                let result = match session.phase() {
                    Phase::Playbook => {
                        state
                            .orchestrator
                            .submit_playbook_message(&mut session, text)
                            .await
                    }
                    Phase::Bpmn => state.orchestrator.submit_bpmn_message(&mut session, text).await,
                    Phase::Mermaid => {
                        state
                            .orchestrator
                            .submit_mermaid_message(&mut session, text)
                            .await
                    }
                };
                let succeeded = result.is_ok();
                report(out, result)?;
                if succeeded {
                    render_latest(out, &session)?;
                }
            }
            WizardCommand::Unknown(command) => {
                say(out, format!("Unknown command: {}. Type /help for commands.", command))?;
            }
        }

        drop(session);
        prompt(out)?;
    }

    // Input closed
    state.sessions.delete(&session_id).await.ok();
    Ok(())
}

fn say<W: Write>(out: &mut W, text: impl Display) -> Result<(), String> {
    writeln!(out, "{}", text).map_err(|e| format!("Failed to write output: {}", e))
}

fn prompt<W: Write>(out: &mut W) -> Result<(), String> {
    write!(out, "\n> ")
        .and_then(|_| out.flush())
        .map_err(|e| format!("Failed to write output: {}", e))
}

fn print_phase_header<W: Write>(out: &mut W, phase: Phase) -> Result<(), String> {
    let header = match phase {
        Phase::Playbook => "Phase 1: Validate and refine the playbook (Playbook agent)",
        Phase::Bpmn => "Phase 2: Adjust the flow (BPMN agent)",
        Phase::Mermaid => "Phase 3: Generate and adjust the Mermaid diagram (Mermaid agent)",
    };
    say(out, "")?;
    say(out, format!("── {} ──", header))
}

fn print_help<W: Write>(out: &mut W) -> Result<(), String> {
    say(out, "Commands:")?;
    say(out, "  <text>          send a message to the current phase's agent")?;
    say(out, "  /next           finish this phase and move to the next one")?;
    say(out, "  /status         show the session state")?;
    say(out, "  /summary        show the final playbook, BPMN and diagram (phase 3)")?;
    say(out, "  /export <path>  write the final document to a file (phase 3)")?;
    say(out, "  /quit           end the session")
}

/// Show the newest agent output for the current phase.
fn render_latest<W: Write>(out: &mut W, session: &Session) -> Result<(), String> {
    match session.phase() {
        Phase::Playbook | Phase::Bpmn => {
            let agent = if session.phase() == Phase::Playbook { "Playbook" } else { "BPMN" };
            if let Some(message) = session.current_history().last() {
                say(out, format!("Agent ({}): {}", agent, message))?;
            }
        }
        Phase::Mermaid => {
            if let Some(message) = session.current_history().last() {
                say(out, format!("Agent (Mermaid): {}", message))?;
            }
            if session.diagram_code().is_empty() {
                say(out, "No diagram has been generated yet.")?;
            } else {
                say(out, "Current diagram version:")?;
                say(out, format!("```mermaid\n{}\n```", session.diagram_code()))?;
            }
        }
    }
    Ok(())
}

fn report<W: Write>(out: &mut W, result: Result<Outcome, ServerError>) -> Result<(), String> {
    match result {
        Ok(outcome) => match outcome.notice {
            Some(notice) => {
                let marker = match notice.level {
                    NoticeLevel::Success => "✓",
                    NoticeLevel::Info => "ℹ",
                };
                say(out, format!("{} {}", marker, notice.message))
            }
            None => Ok(()),
        },
        Err(e) => report_error(out, &e),
    }
}

fn report_error<W: Write>(out: &mut W, error: &ServerError) -> Result<(), String> {
    match error {
        ServerError::Validation(message) => say(out, format!("⚠ {}", message)),
        other => say(out, format!("✗ {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use playbooker_core::config::AgentEndpoints;
    use playbooker_core::state::AppStateInner;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn agents() -> MockServer {
        let server = MockServer::start().await;
        for (route, output) in [
            ("/playbook", "Playbook v1"),
            ("/bpmn", "BPMN v1"),
            ("/mermaid", "graph TD; Start-->End"),
        ] {
            Mock::given(method("POST"))
                .and(path(route))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "output": output })),
                )
                .mount(&server)
                .await;
        }
        server
    }

    fn state_for(agents: &MockServer) -> AppState {
        Arc::new(AppStateInner::new(AgentEndpoints {
            playbook: Some(format!("{}/playbook", agents.uri())),
            bpmn: Some(format!("{}/bpmn", agents.uri())),
            mermaid: Some(format!("{}/mermaid", agents.uri())),
        }))
    }

    async fn run_script(state: &AppState, script: &str) -> String {
        let mut out = Vec::new();
        run_with_io(state, Cursor::new(script.to_string()), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  "), WizardCommand::Empty);
        assert_eq!(parse_command("/q"), WizardCommand::Quit);
        assert_eq!(parse_command("/next"), WizardCommand::Next);
        assert_eq!(parse_command("/export  out.md "), WizardCommand::Export("out.md"));
        assert_eq!(parse_command("/export"), WizardCommand::Export(""));
        assert_eq!(parse_command(" add a step "), WizardCommand::Message(" add a step "));
        assert_eq!(parse_command("/nope"), WizardCommand::Unknown("/nope"));
    }

    #[tokio::test]
    async fn test_wizard_walks_all_phases_and_exports() {
        let agents = agents().await;
        let state = state_for(&agents);
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("final.md");

        let script = format!(
            "Customer onboarding\n/next\nadd approval\n/next\nadd review\n/summary\n/export {}\n/quit\n",
            export.display()
        );
        let output = run_script(&state, &script).await;

        assert!(output.contains("Agent (Playbook): Playbook v1"));
        assert!(output.contains("Phase 2: Adjust the flow"));
        assert!(output.contains("Agent (BPMN): BPMN v1"));
        assert!(output.contains("Phase 3: Generate and adjust"));
        assert!(output.contains("```mermaid\ngraph TD; Start-->End\n```"));
        assert!(output.contains("Agent (Mermaid): Diagram updated per request: add review"));
        assert!(output.contains("#### Final Playbook:\nPlaybook v1"));
        assert!(output.contains("Goodbye!"));

        let exported = std::fs::read_to_string(&export).unwrap();
        assert!(exported.contains("#### Final BPMN Content:\nBPMN v1"));
        assert!(state.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_wizard_rejects_empty_playbook_and_early_summary() {
        let agents = agents().await;
        let state = state_for(&agents);

        let output = run_script(&state, "/next\n/summary\n/bogus\n").await;

        assert!(output.contains("⚠ The playbook is empty."));
        assert!(output.contains("✗ Operation 'finalizeSummary' is not available in the playbook phase"));
        assert!(output.contains("Unknown command: /bogus"));
        assert!(agents.received_requests().await.unwrap().is_empty());
        assert!(state.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_wizard_retries_first_diagram_once_after_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/playbook"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "output": "P" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bpmn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "output": "B" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/mermaid"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;
        let state = state_for(&server);

        let output = run_script(&state, "p\n/next\n/next\n/status\n/status\n").await;

        assert!(output.contains("✗ Agent returned 503: busy"));
        assert!(output.contains("No diagram has been generated yet."));
        let mermaid_calls = server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path() == "/mermaid")
            .count();
        // One eager attempt on /next, one automatic attempt on the next refresh.
        assert_eq!(mermaid_calls, 2);
    }

    #[tokio::test]
    async fn test_wizard_quit_and_help_skip_diagram_refresh() {
        let server = MockServer::start().await;
        for (route, status, body) in [
            ("/playbook", 200u16, r#"{"output":"P"}"#),
            ("/bpmn", 200, r#"{"output":"B"}"#),
            ("/mermaid", 503, "busy"),
        ] {
            Mock::given(method("POST"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status).set_body_string(body))
                .mount(&server)
                .await;
        }
        let state = state_for(&server);

        run_script(&state, "p\n/next\n/next\n/help\n/quit\n").await;

        let requests = server.received_requests().await.unwrap();
        let mermaid_calls = requests.iter().filter(|r| r.url.path() == "/mermaid").count();
        assert_eq!(mermaid_calls, 1);
    }

    #[tokio::test]
    async fn test_wizard_forwards_message_as_typed() {
        let agents = agents().await;
        let state = state_for(&agents);

        run_script(&state, "  Customer onboarding  \n/quit\n").await;

        let requests = agents.received_requests().await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(payload["chatInput"], "  Customer onboarding  ");
    }
}
