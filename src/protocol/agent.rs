//! Agent discovery and liveness payloads

use serde::{Deserialize, Serialize};
use url::Url;

use super::{message::MessagePart, operation::JSONRPC_VERSION};

/// Agent Card for agent discovery
///
/// Describes the simplifier agent to callers: what it does, where its
/// JSON-RPC endpoint lives and which content it accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Name of the agent
    pub name: String,

    /// Human-readable description of the agent
    pub description: String,

    /// JSON-RPC endpoint of the agent
    pub url: Url,

    /// Agent version
    pub version: String,

    /// Protocol version spoken on the endpoint
    pub protocol_version: String,

    /// Agent capabilities
    pub capabilities: AgentCapabilities,

    /// Accepted input MIME types
    pub default_input_modes: Vec<String>,

    /// Produced output MIME types
    pub default_output_modes: Vec<String>,

    /// What the agent can be asked to do
    pub skills: Vec<AgentSkill>,
}

impl AgentCard {
    /// Create a new agent card with no skills
    pub fn new(name: impl Into<String>, description: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url,
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: JSONRPC_VERSION.to_string(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: vec!["text/plain".to_string()],
            default_output_modes: vec!["text/plain".to_string()],
            skills: Vec::new(),
        }
    }

    /// Card for the text simplifier served at `url`
    pub fn simplifier(url: Url) -> Self {
        Self::new(
            "fifth_grade_optimizer",
            "Simplifies any text so a 10-year-old can read it",
            url,
        )
        .with_skill(AgentSkill {
            id: "simplify_text".to_string(),
            name: "Kid Text Simplifier".to_string(),
            description: "Turns hard text into short, easy sentences with the same meaning"
                .to_string(),
            examples: vec![
                "Photosynthesis is the process by which plants convert sunlight into energy."
                    .to_string(),
            ],
        })
    }

    /// Add a skill to the card
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }
}

/// Agent capabilities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Supports streaming responses
    pub streaming: bool,

    /// Supports push notifications via webhooks
    pub push_notifications: bool,

    /// Keeps task state between requests
    pub state_transition_history: bool,

    /// Message part kinds the agent accepts
    pub supported_part_types: Vec<String>,
}

impl Default for AgentCapabilities {
    fn default() -> Self {
        Self {
            streaming: false,
            push_notifications: false,
            state_transition_history: false,
            supported_part_types: MessagePart::SUPPORTED_KINDS
                .iter()
                .map(|kind| kind.to_string())
                .collect(),
        }
    }
}

/// A single capability advertised on the card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Fixed liveness payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub agent: String,
}

impl HealthStatus {
    /// Healthy status for the named agent
    pub fn healthy(agent: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            agent: agent.into(),
        }
    }
}
