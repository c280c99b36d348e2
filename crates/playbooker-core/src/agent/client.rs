//! Agent client — one POST per call, no retries, no backoff.

use async_trait::async_trait;

use super::{AgentKind, AgentRequest};
use crate::error::AgentError;

/// Uniform request/response contract shared by all three agents.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Send `request` to the agent at `url` and return its `output` text.
    ///
    /// A missing or blank `url` fails with [`AgentError::Config`] without
    /// touching the network.
    async fn call_agent(
        &self,
        kind: AgentKind,
        url: Option<&str>,
        request: &AgentRequest,
    ) -> Result<String, AgentError>;
}

/// Calls agent webhooks over HTTP.
#[derive(Clone, Default)]
pub struct HttpAgentClient {
    client: reqwest::Client,
}

impl HttpAgentClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn call_agent(
        &self,
        kind: AgentKind,
        url: Option<&str>,
        request: &AgentRequest,
    ) -> Result<String, AgentError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AgentError::Config(kind.env_var().to_string()))?;

        tracing::info!(
            "[AgentClient] Calling {} agent at {} (session: {})",
            kind,
            endpoint_host(url),
            request.session_id
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| AgentError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AgentError::Transport {
            message: format!("Failed to read response body: {}", e),
        })?;

        if status != reqwest::StatusCode::OK {
            tracing::warn!("[AgentClient] {} agent returned {}", kind, status);
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_output(&body)
    }
}

/// Host part of a webhook URL. Path and query are never logged.
fn endpoint_host(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "<invalid url>".to_string())
}

/// Extract the `output` string from a 200 response body.
pub fn parse_output(body: &str) -> Result<String, AgentError> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AgentError::Protocol(format!("response is not valid JSON: {}", e)))?;

    match json.get("output") {
        Some(serde_json::Value::String(output)) => Ok(output.clone()),
        Some(other) => Err(AgentError::Protocol(format!(
            "'output' is not a string: {}",
            other
        ))),
        None => Err(AgentError::Protocol(
            "response has no 'output' field".to_string(),
        )),
    }
}
