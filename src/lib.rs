//! # Tower A2A Simplifier
//!
//! A Tower-based A2A agent that rewrites text so a 10-year-old can read it.
//!
//! The crate implements the server side of the A2A JSON-RPC binding for a
//! single operation: a request carrying a user message is validated, turned
//! into a task, the message text is handed to an external completion service
//! behind the [`TextTransform`](transform::TextTransform) trait, and the
//! outcome is returned as a JSON-RPC response envelope.
//!
//! ## Features
//!
//! - **Strict Parsing**: Malformed envelopes and unknown part kinds are rejected with JSON-RPC error codes
//! - **Task Lifecycle**: submitted → working → completed | failed, one task per request
//! - **Bounded Calls**: The completion call runs under a timeout owned by the agent
//! - **Pluggable**: Any completion provider, id scheme or codec can be injected
//! - **Tower Native**: The agent is a `Service<Bytes>` mountable in any server
//!
//! ## Example
//!
//! ```rust,no_run
//! use tower_a2a_simplifier::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = A2AAgentBuilder::new_gemini(GeminiConfig::from_env()?)?
//!         .with_timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let body = br#"{"jsonrpc":"2.0","id":"001","method":"message/send",
//!         "params":{"message":{"role":"user","parts":[{"kind":"text","text":"Explain gravity."}]}}}"#;
//!     let response = service.handle_request(body).await;
//!     println!("{}", String::from_utf8_lossy(&response));
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod codec;
pub mod protocol;
pub mod service;
pub mod transform;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        agent::{A2AAgentBuilder, AgentConfig, IdGenerator},
        codec::{Codec, JsonRpcCodec},
        protocol::error::{codes, A2AError},
        protocol::{
            A2AOperation, AgentCard, Envelope, Message, MessagePart, RequestId, Role, Task,
            TaskState, TaskStatus,
        },
        service::{A2AAgentService, A2AResponse},
        transform::{AdapterError, GeminiConfig, GeminiTransform, TextTransform},
    };
}
