//! Sessions API - /api/sessions
//!
//! POST   /api/sessions                          - Create a session
//! GET    /api/sessions                          - List sessions
//! GET    /api/sessions/{id}                     - Session view
//! DELETE /api/sessions/{id}                     - Destroy a session
//! POST   /api/sessions/{id}/playbook/messages   - Message the Playbook agent
//! POST   /api/sessions/{id}/bpmn                - Advance to the Bpmn phase
//! POST   /api/sessions/{id}/bpmn/messages       - Message the BPMN agent
//! POST   /api/sessions/{id}/mermaid             - Advance to the Mermaid phase
//! POST   /api/sessions/{id}/mermaid/init        - Generate the first diagram once
//! POST   /api/sessions/{id}/mermaid/messages    - Message the Mermaid agent
//! GET    /api/sessions/{id}/summary             - Final document

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use playbooker_core::models::Session;
use playbooker_core::orchestration::Outcome;
use playbooker_core::state::AppState;
use playbooker_core::ServerError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/{session_id}", get(get_session).delete(delete_session))
        .route("/{session_id}/playbook/messages", post(submit_playbook_message))
        .route("/{session_id}/bpmn", post(advance_to_bpmn))
        .route("/{session_id}/bpmn/messages", post(submit_bpmn_message))
        .route("/{session_id}/mermaid", post(advance_to_mermaid))
        .route("/{session_id}/mermaid/init", post(ensure_diagram_initialized))
        .route("/{session_id}/mermaid/messages", post(submit_mermaid_message))
        .route("/{session_id}/summary", get(finalize_summary))
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    #[serde(default)]
    text: String,
}

/// Text of a message body. Missing or malformed JSON is a validation error.
fn message_text(
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<String, ServerError> {
    payload
        .map(|Json(body)| body.text)
        .map_err(|rejection| ServerError::Validation(rejection.body_text()))
}

fn operation_response(outcome: Outcome, session: &Session) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "notice": outcome.notice,
        "clearInput": outcome.clear_input,
        "session": session.view(),
    }))
}

/// POST /api/sessions — Start a new wizard session.
async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let session = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "session": session.view() })),
    )
}

/// GET /api/sessions — List sessions, most recently updated first.
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list().await;
    Json(serde_json::json!({ "sessions": sessions }))
}

/// GET /api/sessions/{session_id} — Everything the presentation layer renders.
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let handle = state.sessions.get(&session_id).await?;
    let session = handle.lock().await;
    Ok(Json(serde_json::json!({ "session": session.view() })))
}

/// DELETE /api/sessions/{session_id} — Destroy a session (reset).
async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state.sessions.delete(&session_id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

async fn submit_playbook_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let handle = state.sessions.get(&session_id).await?;
    let text = message_text(payload)?;
    let mut session = handle.lock().await;
    let outcome = state
        .orchestrator
        .submit_playbook_message(&mut session, &text)
        .await?;
    Ok(operation_response(outcome, &session))
}

async fn advance_to_bpmn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let handle = state.sessions.get(&session_id).await?;
    let mut session = handle.lock().await;
    let outcome = state.orchestrator.advance_to_bpmn(&mut session).await?;
    Ok(operation_response(outcome, &session))
}

async fn submit_bpmn_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let handle = state.sessions.get(&session_id).await?;
    let text = message_text(payload)?;
    let mut session = handle.lock().await;
    let outcome = state
        .orchestrator
        .submit_bpmn_message(&mut session, &text)
        .await?;
    Ok(operation_response(outcome, &session))
}

/// POST /api/sessions/{session_id}/mermaid — Enter the Mermaid phase.
///
/// The phase advances even when the diagram call fails; the error response
/// is returned and a later GET shows the session in the mermaid phase.
async fn advance_to_mermaid(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let handle = state.sessions.get(&session_id).await?;
    let mut session = handle.lock().await;
    let outcome = state.orchestrator.advance_to_mermaid(&mut session).await?;
    Ok(operation_response(outcome, &session))
}

/// POST /api/sessions/{session_id}/mermaid/init — Called on each view refresh.
async fn ensure_diagram_initialized(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let handle = state.sessions.get(&session_id).await?;
    let mut session = handle.lock().await;
    let outcome = state
        .orchestrator
        .ensure_diagram_initialized(&mut session)
        .await?;
    Ok(operation_response(outcome, &session))
}

async fn submit_mermaid_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let handle = state.sessions.get(&session_id).await?;
    let text = message_text(payload)?;
    let mut session = handle.lock().await;
    let outcome = state
        .orchestrator
        .submit_mermaid_message(&mut session, &text)
        .await?;
    Ok(operation_response(outcome, &session))
}

/// GET /api/sessions/{session_id}/summary — Final playbook, BPMN and diagram.
async fn finalize_summary(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let handle = state.sessions.get(&session_id).await?;
    let session = handle.lock().await;
    let summary = state.orchestrator.finalize_summary(&session)?;
    Ok(Json(serde_json::json!({
        "sessionId": session.session_id(),
        "summary": summary,
    })))
}
