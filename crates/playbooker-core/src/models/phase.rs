use std::fmt;

use serde::{Deserialize, Serialize};

/// Wizard stage. Advances `Playbook → Bpmn → Mermaid` and never goes back.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Playbook,
    Bpmn,
    Mermaid,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playbook => "playbook",
            Self::Bpmn => "bpmn",
            Self::Mermaid => "mermaid",
        }
    }

    /// The phase that follows this one, if any.
    pub fn next(&self) -> Option<Phase> {
        match self {
            Self::Playbook => Some(Self::Bpmn),
            Self::Bpmn => Some(Self::Mermaid),
            Self::Mermaid => None,
        }
    }

    pub fn allows(&self, operation: Operation) -> bool {
        operation.phase() == *self
    }

    /// Operations a presentation layer may offer in this phase.
    pub fn allowed_operations(&self) -> Vec<Operation> {
        Operation::ALL
            .iter()
            .copied()
            .filter(|op| self.allows(*op))
            .collect()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every user- or system-triggered action on a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    SubmitPlaybookMessage,
    AdvanceToBpmn,
    SubmitBpmnMessage,
    AdvanceToMermaid,
    EnsureDiagramInitialized,
    SubmitMermaidMessage,
    FinalizeSummary,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::SubmitPlaybookMessage,
        Operation::AdvanceToBpmn,
        Operation::SubmitBpmnMessage,
        Operation::AdvanceToMermaid,
        Operation::EnsureDiagramInitialized,
        Operation::SubmitMermaidMessage,
        Operation::FinalizeSummary,
    ];

    /// The only phase in which this operation is valid.
    pub fn phase(&self) -> Phase {
        match self {
            Self::SubmitPlaybookMessage | Self::AdvanceToBpmn => Phase::Playbook,
            Self::SubmitBpmnMessage | Self::AdvanceToMermaid => Phase::Bpmn,
            Self::EnsureDiagramInitialized | Self::SubmitMermaidMessage | Self::FinalizeSummary => {
                Phase::Mermaid
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitPlaybookMessage => "submitPlaybookMessage",
            Self::AdvanceToBpmn => "advanceToBpmn",
            Self::SubmitBpmnMessage => "submitBpmnMessage",
            Self::AdvanceToMermaid => "advanceToMermaid",
            Self::EnsureDiagramInitialized => "ensureDiagramInitialized",
            Self::SubmitMermaidMessage => "submitMermaidMessage",
            Self::FinalizeSummary => "finalizeSummary",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
