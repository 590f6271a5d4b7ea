//! A2A protocol operations and the JSON-RPC request envelope

use serde::{de, Deserialize, Deserializer, Serialize};

use super::message::Message;

/// JSON-RPC protocol version accepted and emitted by the agent
pub const JSONRPC_VERSION: &str = "2.0";

/// Caller-supplied correlation id
///
/// Echoed verbatim into the response, `null` included. Numbers keep the
/// caller's spelling, so `1.10`, `1e2` and integers wider than 64 bits are
/// written back exactly as received.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RequestId {
    /// String id
    String(String),

    /// Numeric id, kept as the caller's JSON number
    Number(serde_json::Number),

    /// Explicit `null`, or an id that could not be read
    #[default]
    Null,
}

impl RequestId {
    /// Read an id from a JSON value; only strings, numbers and null qualify
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(RequestId::String(s.clone())),
            serde_json::Value::Number(n) => Some(RequestId::Number(n.clone())),
            serde_json::Value::Null => Some(RequestId::Null),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        RequestId::from_value(&value)
            .ok_or_else(|| de::Error::custom("id must be a string, a number or null"))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::Null => f.write_str("null"),
        }
    }
}

/// A2A protocol operations supported by the agent
#[derive(Debug, Clone, PartialEq)]
pub enum A2AOperation {
    /// Send one message to the agent
    SendMessage {
        /// The message to simplify
        message: Message,

        /// Context to file the task under, if the caller has one
        context_id: Option<String>,
    },

    /// Run the agent over a list of messages; the last one carries the text
    Execute {
        /// Messages in conversation order (non-empty)
        messages: Vec<Message>,

        /// Context to file the task under, if the caller has one
        context_id: Option<String>,
    },
}

impl A2AOperation {
    /// JSON-RPC method name of `message/send`
    pub const SEND_MESSAGE: &'static str = "message/send";

    /// JSON-RPC method name of `execute`
    pub const EXECUTE: &'static str = "execute";

    /// Method names the agent answers to
    pub const METHODS: &'static [&'static str] = &[Self::SEND_MESSAGE, Self::EXECUTE];

    /// The JSON-RPC method name for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::SendMessage { .. } => Self::SEND_MESSAGE,
            A2AOperation::Execute { .. } => Self::EXECUTE,
        }
    }

    /// Whether `method` names a supported operation
    pub fn is_supported(method: &str) -> bool {
        Self::METHODS.contains(&method)
    }

    /// The message whose text is handed to the text transform
    pub fn payload(&self) -> Option<&Message> {
        match self {
            A2AOperation::SendMessage { message, .. } => Some(message),
            A2AOperation::Execute { messages, .. } => messages.last(),
        }
    }

    /// Inbound messages, in order, as recorded in the task history
    pub fn messages(&self) -> &[Message] {
        match self {
            A2AOperation::SendMessage { message, .. } => std::slice::from_ref(message),
            A2AOperation::Execute { messages, .. } => messages,
        }
    }

    /// Context id supplied by the caller, from the params or the payload message
    pub fn context_id(&self) -> Option<&str> {
        let explicit = match self {
            A2AOperation::SendMessage { context_id, .. }
            | A2AOperation::Execute { context_id, .. } => context_id.as_deref(),
        };

        explicit.or_else(|| self.payload().and_then(|m| m.context_id.as_deref()))
    }
}

/// A validated inbound JSON-RPC request
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Correlation id to echo
    pub id: RequestId,

    /// The requested operation with its params
    pub operation: A2AOperation,
}

impl Envelope {
    /// Create a new envelope
    pub fn new(id: RequestId, operation: A2AOperation) -> Self {
        Self { id, operation }
    }

    /// The JSON-RPC method name
    pub fn method(&self) -> &'static str {
        self.operation.method()
    }
}
