//! Error types for A2A protocol operations

use std::time::Duration;

use thiserror::Error;

use super::operation::RequestId;
use crate::transform::AdapterError;

/// JSON-RPC error codes used by the agent
pub mod codes {
    /// Body is not valid JSON
    pub const PARSE_ERROR: i64 = -32700;

    /// Body is JSON but not a valid JSON-RPC request
    pub const INVALID_REQUEST: i64 = -32600;

    /// Method is not supported by the agent
    pub const METHOD_NOT_FOUND: i64 = -32601;

    /// Params do not match the method's schema, or carry no text
    pub const INVALID_PARAMS: i64 = -32602;

    /// Unexpected failure inside the agent
    pub const INTERNAL_ERROR: i64 = -32603;

    /// Text transform exceeded its time bound
    pub const ADAPTER_TIMEOUT: i64 = -32001;

    /// Text transform refused the input
    pub const ADAPTER_REJECTED: i64 = -32002;

    /// Text transform could not be reached
    pub const ADAPTER_UNAVAILABLE: i64 = -32003;
}

/// Main error type for A2A protocol operations
#[derive(Debug, Error)]
pub enum A2AError {
    /// The request could not be parsed or failed schema validation
    #[error("Malformed request: {0}")]
    Malformed(#[from] ParseError),

    /// The request carried no usable text
    #[error("Message contains no text to simplify")]
    EmptyPayload,

    /// The text transform did not finish within the configured bound
    #[error("Text transform timed out after {}ms", .timeout.as_millis())]
    AdapterTimeout { timeout: Duration },

    /// The text transform service could not be reached
    #[error("Text transform unavailable: {0}")]
    AdapterUnavailable(String),

    /// The text transform refused the input
    #[error("Text transform rejected the request: {0}")]
    AdapterRejected(String),

    /// Invalid configuration supplied at construction time
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unexpected fault in the agent itself
    #[error("Internal error: {0}")]
    Internal(String),
}

impl A2AError {
    /// JSON-RPC error code reported to the caller
    pub fn code(&self) -> i64 {
        match self {
            A2AError::Malformed(err) => err.code(),
            A2AError::EmptyPayload => codes::INVALID_PARAMS,
            A2AError::AdapterTimeout { .. } => codes::ADAPTER_TIMEOUT,
            A2AError::AdapterRejected(_) => codes::ADAPTER_REJECTED,
            A2AError::AdapterUnavailable(_) => codes::ADAPTER_UNAVAILABLE,
            A2AError::Config(_) | A2AError::Serialization(_) | A2AError::Internal(_) => {
                codes::INTERNAL_ERROR
            }
        }
    }

    /// Message safe to put on the wire
    ///
    /// Internal faults are reduced to a generic message; their detail only
    /// goes to the logs.
    pub fn public_message(&self) -> String {
        match self {
            A2AError::Malformed(err) => err.detail.clone(),
            A2AError::EmptyPayload => "No text content in message".to_string(),
            A2AError::AdapterTimeout { timeout } => format!(
                "Text simplification timed out after {}ms; the request may be retried",
                timeout.as_millis()
            ),
            A2AError::AdapterUnavailable(_) => {
                "Text simplification service is unavailable; the request may be retried"
                    .to_string()
            }
            A2AError::AdapterRejected(reason) => format!(
                "Text simplification was refused ({}); retrying will not help",
                reason
            ),
            A2AError::Config(_) | A2AError::Serialization(_) | A2AError::Internal(_) => {
                "Internal error".to_string()
            }
        }
    }

    /// Whether the same request could succeed if sent again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            A2AError::AdapterTimeout { .. } | A2AError::AdapterUnavailable(_)
        )
    }
}

impl From<AdapterError> for A2AError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Timeout(timeout) => A2AError::AdapterTimeout { timeout },
            AdapterError::Unavailable(reason) => A2AError::AdapterUnavailable(reason),
            AdapterError::Rejected(reason) => A2AError::AdapterRejected(reason),
            AdapterError::Misconfigured(reason) => {
                A2AError::Internal(format!("text transform misconfigured: {}", reason))
            }
            AdapterError::InvalidResponse(reason) => {
                A2AError::Internal(format!("unusable text transform response: {}", reason))
            }
        }
    }
}

/// Category of a request that failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Body is not JSON
    InvalidJson,

    /// Envelope violates JSON-RPC 2.0
    InvalidRequest,

    /// Method is not one the agent supports
    MethodNotFound,

    /// Params violate the message schema
    InvalidParams,
}

impl ParseErrorKind {
    /// JSON-RPC error code for this kind
    pub fn code(&self) -> i64 {
        match self {
            ParseErrorKind::InvalidJson => codes::PARSE_ERROR,
            ParseErrorKind::InvalidRequest => codes::INVALID_REQUEST,
            ParseErrorKind::MethodNotFound => codes::METHOD_NOT_FOUND,
            ParseErrorKind::InvalidParams => codes::INVALID_PARAMS,
        }
    }
}

/// Structured rejection of an inbound request
///
/// Carries the request id recovered before the failure so the error
/// envelope can still echo it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{detail}")]
pub struct ParseError {
    /// Machine-readable category
    pub kind: ParseErrorKind,

    /// Human-readable detail
    pub detail: String,

    /// Request id, `Null` when it could not be read
    pub id: RequestId,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ParseErrorKind, detail: impl Into<String>, id: RequestId) -> Self {
        Self {
            kind,
            detail: detail.into(),
            id,
        }
    }

    /// JSON-RPC error code
    pub fn code(&self) -> i64 {
        self.kind.code()
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;
