//! Agent endpoint configuration.
//!
//! The three webhook URLs (`PLAYBOOK_WEBHOOK_URL`, `BPMN_WEBHOOK_URL`,
//! `MERMAID_WEBHOOK_URL`) are read once at startup and stay read-only for
//! the life of the process. A missing URL only disables the operations that
//! target that agent.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::agent::AgentKind;

/// Webhook URLs for the three agents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentEndpoints {
    pub playbook: Option<String>,
    pub bpmn: Option<String>,
    pub mermaid: Option<String>,
}

/// Which endpoints are configured, without exposing the URLs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EndpointStatus {
    pub playbook: bool,
    pub bpmn: bool,
    pub mermaid: bool,
}

impl AgentEndpoints {
    /// Read the three `*_WEBHOOK_URL` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            playbook: lookup(AgentKind::Playbook.env_var()),
            bpmn: lookup(AgentKind::Bpmn.env_var()),
            mermaid: lookup(AgentKind::Mermaid.env_var()),
        }
    }

    /// URL for `kind`; blank values count as unset.
    pub fn url(&self, kind: AgentKind) -> Option<&str> {
        let url = match kind {
            AgentKind::Playbook => self.playbook.as_deref(),
            AgentKind::Bpmn => self.bpmn.as_deref(),
            AgentKind::Mermaid => self.mermaid.as_deref(),
        };
        url.map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn status(&self) -> EndpointStatus {
        EndpointStatus {
            playbook: self.url(AgentKind::Playbook).is_some(),
            bpmn: self.url(AgentKind::Bpmn).is_some(),
            mermaid: self.url(AgentKind::Mermaid).is_some(),
        }
    }
}

/// Load `.env.local` and `.env` from the current directory.
pub fn load_dotenv() -> Vec<PathBuf> {
    load_dotenv_from(Path::new("."))
}

/// Load `.env.local` then `.env` from `dir`.
///
/// Variables already present in the environment are never overwritten, so
/// `.env.local` wins over `.env` and the real environment wins over both.
/// Returns the files that were read. Usually called before any tracing
/// subscriber exists, so the caller logs them.
pub fn load_dotenv_from(dir: &Path) -> Vec<PathBuf> {
    let mut loaded = Vec::new();
    for filename in &[".env.local", ".env"] {
        let path = dir.join(filename);
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        for (key, value) in content.lines().filter_map(parse_env_line) {
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
        loaded.push(path);
    }
    loaded
}

/// Parse one `KEY=VALUE` line; comments and blank lines yield `None`.
fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim();
    let value = if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    };
    Some((key, value))
}
