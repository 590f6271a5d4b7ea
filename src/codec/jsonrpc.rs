//! JSON-RPC 2.0 codec for the A2A protocol
//!
//! Parses inbound request envelopes into validated [`Envelope`]s and
//! serializes tasks and errors into JSON-RPC 2.0 response envelopes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    codec::Codec,
    protocol::{
        error::{A2AError, ParseError, ParseErrorKind},
        message::{Message, MessagePart},
        operation::{A2AOperation, Envelope, RequestId, JSONRPC_VERSION},
        task::Task,
    },
};

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Serialize)]
struct JsonRpcResponse<'a> {
    jsonrpc: &'static str,
    id: &'a RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a ErrorObject>,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Error code
    pub code: i64,

    /// Short description of the error
    pub message: String,

    /// Additional structured information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    /// Create a new error object without data
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach structured data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<&A2AError> for ErrorObject {
    fn from(err: &A2AError) -> Self {
        Self::new(err.code(), err.public_message())
    }
}

/// Params of `message/send`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageParams {
    message: Value,
    #[serde(default)]
    context_id: Option<String>,
}

/// Params of `execute`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteParams {
    messages: Vec<Value>,
    #[serde(default)]
    context_id: Option<String>,
}

/// Parse and validate a raw JSON-RPC request
///
/// Either every check passes and a complete [`Envelope`] is returned, or a
/// [`ParseError`] describes the first violation found.
pub fn parse_envelope(raw: &[u8]) -> Result<Envelope, ParseError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::new(
            ParseErrorKind::InvalidRequest,
            "Empty request body",
            RequestId::Null,
        ));
    }

    let body: Value = serde_json::from_slice(raw).map_err(|e| {
        ParseError::new(
            ParseErrorKind::InvalidJson,
            format!("Invalid JSON in request body: {}", e),
            RequestId::Null,
        )
    })?;

    let Value::Object(mut body) = body else {
        return Err(ParseError::new(
            ParseErrorKind::InvalidRequest,
            "Request must be a JSON object",
            RequestId::Null,
        ));
    };

    let id = match body.get("id") {
        Some(value) => RequestId::from_value(value).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::InvalidRequest,
                "'id' must be a string, number or null",
                RequestId::Null,
            )
        })?,
        None => {
            return Err(ParseError::new(
                ParseErrorKind::InvalidRequest,
                "Missing 'id'",
                RequestId::Null,
            ))
        }
    };

    let invalid_request = |detail: &str| {
        ParseError::new(ParseErrorKind::InvalidRequest, detail, id.clone())
    };

    match body.get("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => {}
        Some(_) => return Err(invalid_request("'jsonrpc' must be exactly \"2.0\"")),
        None => return Err(invalid_request("Missing 'jsonrpc'")),
    }

    let method = match body.get("method") {
        Some(Value::String(method)) => method.clone(),
        Some(_) => return Err(invalid_request("'method' must be a string")),
        None => return Err(invalid_request("Missing 'method'")),
    };

    if !A2AOperation::is_supported(&method) {
        return Err(ParseError::new(
            ParseErrorKind::MethodNotFound,
            format!("Method not found: {}", method),
            id,
        ));
    }

    let params = body
        .remove("params")
        .ok_or_else(|| invalid_params("Missing 'params'", &id))?;

    let operation = decode_operation(&method, params).map_err(|detail| invalid_params(detail, &id))?;

    Ok(Envelope::new(id, operation))
}

fn invalid_params(detail: impl Into<String>, id: &RequestId) -> ParseError {
    ParseError::new(ParseErrorKind::InvalidParams, detail, id.clone())
}

fn decode_operation(method: &str, params: Value) -> Result<A2AOperation, String> {
    if !params.is_object() {
        return Err("'params' must be an object".to_string());
    }

    match method {
        A2AOperation::SEND_MESSAGE => {
            let params: SendMessageParams = serde_json::from_value(params)
                .map_err(|e| format!("Invalid params for '{}': {}", method, e))?;

            Ok(A2AOperation::SendMessage {
                message: decode_message(params.message)?,
                context_id: params.context_id,
            })
        }
        A2AOperation::EXECUTE => {
            let params: ExecuteParams = serde_json::from_value(params)
                .map_err(|e| format!("Invalid params for '{}': {}", method, e))?;

            if params.messages.is_empty() {
                return Err("'messages' must contain at least one message".to_string());
            }

            let messages = params
                .messages
                .into_iter()
                .map(decode_message)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(A2AOperation::Execute {
                messages,
                context_id: params.context_id,
            })
        }
        other => Err(format!("Unsupported method: {}", other)),
    }
}

/// Validate the parts of a message before handing it to serde
///
/// Checking kinds up front yields a precise error for unsupported parts
/// instead of serde's generic variant mismatch.
fn decode_message(value: Value) -> Result<Message, String> {
    let Some(object) = value.as_object() else {
        return Err("'message' must be an object".to_string());
    };

    let parts = match object.get("parts") {
        Some(Value::Array(parts)) => parts,
        Some(_) => return Err("'parts' must be an array".to_string()),
        None => return Err("Message is missing 'parts'".to_string()),
    };

    if parts.is_empty() {
        return Err("Message must have at least one part".to_string());
    }

    for (index, part) in parts.iter().enumerate() {
        check_part(index, part)?;
    }

    serde_json::from_value(value).map_err(|e| format!("Invalid message: {}", e))
}

fn check_part(index: usize, part: &Value) -> Result<(), String> {
    let empty = Map::new();
    let part = part.as_object().unwrap_or(&empty);

    match part.get("kind").and_then(Value::as_str) {
        Some(kind) if MessagePart::SUPPORTED_KINDS.contains(&kind) => {}
        Some(kind) => {
            return Err(format!(
                "Part {} has unsupported kind '{}'; supported kinds: {}",
                index,
                kind,
                MessagePart::SUPPORTED_KINDS.join(", ")
            ))
        }
        None => return Err(format!("Part {} is missing a string 'kind'", index)),
    }

    match part.get("text") {
        Some(Value::String(_)) => Ok(()),
        _ => Err(format!("Text part {} must carry a string 'text'", index)),
    }
}

/// Serialize a task into a success envelope
pub fn build_success_envelope(id: &RequestId, task: &Task) -> Result<Bytes, A2AError> {
    encode(&JsonRpcResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        result: Some(task),
        error: None,
    })
}

/// Serialize an error description into an error envelope
pub fn build_error_envelope(id: &RequestId, code: i64, message: &str) -> Result<Bytes, A2AError> {
    build_error_object_envelope(id, &ErrorObject::new(code, message))
}

/// Serialize a full error object, `data` included, into an error envelope
pub fn build_error_object_envelope(id: &RequestId, error: &ErrorObject) -> Result<Bytes, A2AError> {
    encode(&JsonRpcResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        result: None,
        error: Some(error),
    })
}

fn encode(response: &JsonRpcResponse<'_>) -> Result<Bytes, A2AError> {
    let bytes = serde_json::to_vec(response)?;
    Ok(Bytes::from(bytes))
}

/// JSON-RPC 2.0 codec for the A2A protocol
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonRpcCodec {
    fn decode_request(&self, body: &[u8]) -> Result<Envelope, ParseError> {
        parse_envelope(body)
    }

    fn encode_success(&self, id: &RequestId, task: &Task) -> Result<Bytes, A2AError> {
        build_success_envelope(id, task)
    }

    fn encode_error(&self, id: &RequestId, error: &ErrorObject) -> Result<Bytes, A2AError> {
        build_error_object_envelope(id, error)
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
