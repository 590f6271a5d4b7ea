//! Core A2A protocol types and definitions

use serde::{Deserialize, Serialize};

pub mod agent;
pub mod error;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{AgentCapabilities, AgentCard, AgentSkill, HealthStatus};
pub use error::{A2AError, A2AResult, ParseError, ParseErrorKind};
pub use message::{Message, MessagePart, Role};
pub use operation::{A2AOperation, Envelope, RequestId};
pub use task::{Task, TaskState, TaskStatus};

/// Artifacts represent task outputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Unique identifier of the Artifact
    pub artifact_id: String,

    /// A human readable name for the Artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Contents of the Artifact. Must contain at least one part
    pub parts: Vec<MessagePart>,
}

impl Artifact {
    /// Create a named artifact holding a single text part
    pub fn text(
        artifact_id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            name: Some(name.into()),
            parts: vec![MessagePart::text(text)],
        }
    }
}
