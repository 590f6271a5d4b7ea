//! Core A2A agent service implementation

use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use bytes::Bytes;
use tower_service::Service;

use crate::{
    codec::{build_error_envelope, Codec, ErrorObject},
    protocol::{
        agent::{AgentCard, HealthStatus},
        error::{codes, A2AError},
        operation::RequestId,
    },
    service::{lifecycle::TaskManager, A2AResponse},
    transform::TextTransform,
};

/// Last-resort body when an envelope cannot be serialized at all
const INTERNAL_ERROR_BODY: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

/// Name reported by the liveness payload when no agent card is set
const DEFAULT_AGENT_NAME: &str = "fifth_grade_optimizer";

/// Tower service answering raw JSON-RPC request bodies
///
/// Every call resolves to a JSON-RPC response body: parse failures,
/// validation failures and transform failures all become error envelopes,
/// so the service itself never errors.
pub struct A2AAgentService<T> {
    manager: Arc<TaskManager<T>>,
    codec: Arc<dyn Codec>,
    card: Option<Arc<AgentCard>>,
}

impl<T> A2AAgentService<T>
where
    T: TextTransform,
{
    /// Create a new agent service
    ///
    /// # Arguments
    ///
    /// * `manager` - The task lifecycle manager
    /// * `codec` - The codec for the wire format
    pub fn new(manager: TaskManager<T>, codec: Arc<dyn Codec>) -> Self {
        Self {
            manager: Arc::new(manager),
            codec,
            card: None,
        }
    }

    /// Attach the agent card served for discovery
    pub fn with_agent_card(mut self, card: AgentCard) -> Self {
        self.card = Some(Arc::new(card));
        self
    }

    /// The agent card, if one was configured
    pub fn agent_card(&self) -> Option<&AgentCard> {
        self.card.as_deref()
    }

    /// Fixed liveness payload
    pub fn health(&self) -> HealthStatus {
        HealthStatus::healthy(
            self.card
                .as_ref()
                .map(|card| card.name.as_str())
                .unwrap_or(DEFAULT_AGENT_NAME),
        )
    }

    /// Content type of response bodies
    pub fn content_type(&self) -> &str {
        self.codec.content_type()
    }

    /// The task lifecycle manager
    pub fn manager(&self) -> &TaskManager<T> {
        &self.manager
    }

    /// Answer one raw request body
    pub async fn handle_request(&self, body: &[u8]) -> Bytes {
        Self::process(&self.manager, self.codec.as_ref(), body).await
    }

    async fn process(manager: &TaskManager<T>, codec: &dyn Codec, body: &[u8]) -> Bytes {
        let response = match codec.decode_request(body) {
            Ok(envelope) => manager.handle(envelope).await,
            Err(err) => {
                tracing::warn!(
                    id = %err.id,
                    code = err.code(),
                    "Malformed request: {}",
                    err.detail
                );
                let id = err.id.clone();
                A2AResponse::error(id, ErrorObject::from(&A2AError::from(err)))
            }
        };

        match response.encode(codec) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(id = %response.id, "Failed to encode response: {}", err);
                Self::internal_error(&response.id)
            }
        }
    }

    fn internal_error(id: &RequestId) -> Bytes {
        build_error_envelope(id, codes::INTERNAL_ERROR, "Internal error")
            .unwrap_or_else(|_| Bytes::from_static(INTERNAL_ERROR_BODY.as_bytes()))
    }
}

impl<T> Service<Bytes> for A2AAgentService<T>
where
    T: TextTransform,
{
    type Response = Bytes;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Requests share no mutable state, so the service is always ready
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Bytes) -> Self::Future {
        let manager = self.manager.clone();
        let codec = self.codec.clone();

        Box::pin(async move { Ok(Self::process(&manager, codec.as_ref(), &req).await) })
    }
}

impl<T> Clone for A2AAgentService<T> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            codec: self.codec.clone(),
            card: self.card.clone(),
        }
    }
}
