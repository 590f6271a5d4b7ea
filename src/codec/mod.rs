//! Serialization codecs for the agent's protocol binding

pub mod jsonrpc;

pub use jsonrpc::{
    build_error_envelope, build_error_object_envelope, build_success_envelope, parse_envelope,
    ErrorObject, JsonRpcCodec,
};

use bytes::Bytes;

use crate::protocol::{
    error::{A2AError, ParseError},
    operation::{Envelope, RequestId},
    task::Task,
};

/// Codec trait for decoding A2A requests and encoding responses
///
/// Implementations own the wire format; the agent service only deals in
/// envelopes, tasks and error objects.
pub trait Codec: Send + Sync {
    /// Parse and validate a request body
    ///
    /// # Arguments
    ///
    /// * `body` - The raw request body
    ///
    /// # Returns
    ///
    /// The validated envelope, or a structured rejection carrying the
    /// request id read so far
    fn decode_request(&self, body: &[u8]) -> Result<Envelope, ParseError>;

    /// Serialize a resolved task as a success response
    fn encode_success(&self, id: &RequestId, task: &Task) -> Result<Bytes, A2AError>;

    /// Serialize an error as an error response
    fn encode_error(&self, id: &RequestId, error: &ErrorObject) -> Result<Bytes, A2AError>;

    /// Get the content type for this codec
    ///
    /// # Returns
    ///
    /// The MIME type of encoded responses
    fn content_type(&self) -> &str;
}
