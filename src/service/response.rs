//! A2A service response types

use bytes::Bytes;

use crate::{
    codec::{Codec, ErrorObject},
    protocol::{error::A2AError, operation::RequestId, task::Task},
};

/// Outbound envelope produced for one request
#[derive(Debug, Clone)]
pub struct A2AResponse {
    /// The caller's id, echoed unchanged
    pub id: RequestId,

    /// Result or error
    pub body: ResponseBody,
}

/// Payload of an outbound envelope
#[derive(Debug, Clone)]
pub enum ResponseBody {
    /// Completed task (JSON-RPC `result`)
    Task(Box<Task>),

    /// Failure (JSON-RPC `error`)
    Error(ErrorObject),
}

impl A2AResponse {
    /// Create a success response
    pub fn task(id: RequestId, task: Task) -> Self {
        Self {
            id,
            body: ResponseBody::Task(Box::new(task)),
        }
    }

    /// Create an error response
    pub fn error(id: RequestId, error: ErrorObject) -> Self {
        Self {
            id,
            body: ResponseBody::Error(error),
        }
    }

    /// Extract the task from the response, if present
    pub fn into_task(self) -> Option<Task> {
        match self.body {
            ResponseBody::Task(task) => Some(*task),
            ResponseBody::Error(_) => None,
        }
    }

    /// The error object, if this is an error response
    pub fn error_object(&self) -> Option<&ErrorObject> {
        match &self.body {
            ResponseBody::Error(error) => Some(error),
            ResponseBody::Task(_) => None,
        }
    }

    /// Check if the response is an error
    pub fn is_error(&self) -> bool {
        matches!(self.body, ResponseBody::Error(_))
    }

    /// Serialize the response with `codec`
    pub fn encode(&self, codec: &dyn Codec) -> Result<Bytes, A2AError> {
        match &self.body {
            ResponseBody::Task(task) => codec.encode_success(&self.id, task),
            ResponseBody::Error(error) => codec.encode_error(&self.id, error),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{codec::JsonRpcCodec, protocol::error::codes};

    use super::*;

    #[test]
    fn test_response_task() {
        let response = A2AResponse::task(RequestId::Null, Task::new("task-123", "ctx"));

        assert!(!response.is_error());
        assert!(response.error_object().is_none());
        assert_eq!(response.into_task().unwrap().id, "task-123");
    }

    #[test]
    fn test_response_error_encoding() {
        let response = A2AResponse::error(
            RequestId::String("q".into()),
            ErrorObject::new(codes::INVALID_PARAMS, "No text content in message"),
        );
        assert!(response.is_error());

        let bytes = response.encode(&JsonRpcCodec::new()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["id"], "q");
        assert_eq!(json["error"]["code"], codes::INVALID_PARAMS);
    }
}
