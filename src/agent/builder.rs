//! Builder for assembling the agent service

use std::{sync::Arc, time::Duration};

use crate::{
    agent::{
        config::AgentConfig,
        ids::{IdGenerator, UuidV7Ids},
    },
    codec::{Codec, JsonRpcCodec},
    protocol::{agent::AgentCard, error::A2AError},
    service::{A2AAgentService, TaskManager},
    transform::{GeminiConfig, GeminiTransform, TextTransform},
};

/// Builder for constructing the A2A agent service
///
/// Everything the service needs is handed in here, at construction time;
/// nothing is read from the environment while requests are served.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use tower_a2a_simplifier::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let service = A2AAgentBuilder::new_gemini(GeminiConfig::from_env()?)?
///     .with_timeout(Duration::from_secs(20))
///     .build()?;
///
/// let body = br#"{"jsonrpc":"2.0","id":1,"method":"message/send",
///     "params":{"message":{"role":"user","parts":[{"kind":"text","text":"Explain gravity."}]}}}"#;
/// let response = service.handle_request(body).await;
/// println!("{}", String::from_utf8_lossy(&response));
/// # Ok(())
/// # }
/// ```
pub struct A2AAgentBuilder<T: TextTransform> {
    transform: Option<T>,
    codec: Option<Arc<dyn Codec>>,
    ids: Option<Arc<dyn IdGenerator>>,
    config: AgentConfig,
    card: Option<AgentCard>,
}

impl<T: TextTransform> A2AAgentBuilder<T> {
    /// Create an empty builder with the default configuration
    pub fn new() -> Self {
        Self {
            transform: None,
            codec: None,
            ids: None,
            config: AgentConfig::default(),
            card: None,
        }
    }

    /// Use a text transform
    ///
    /// # Arguments
    ///
    /// * `transform` - The text transform implementation to use
    pub fn with_transform(mut self, transform: T) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Use a custom codec
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Use a custom id generator
    pub fn with_id_generator(mut self, ids: impl IdGenerator) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the bound on the text transform call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the number of retries after transient transform failures
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Serve an agent card for discovery
    pub fn with_agent_card(mut self, card: AgentCard) -> Self {
        self.card = Some(card);
        self
    }

    /// Build the agent service
    ///
    /// # Errors
    ///
    /// Returns an error if no transform has been configured, the timeout is
    /// zero, or the instruction is blank
    pub fn build(self) -> Result<A2AAgentService<T>, A2AError> {
        let transform = self.transform.ok_or_else(|| {
            A2AError::Config("Text transform not configured. Call with_transform()".into())
        })?;

        if self.config.timeout.is_zero() {
            return Err(A2AError::Config("Timeout must be greater than zero".into()));
        }
        if self.config.instruction.trim().is_empty() {
            return Err(A2AError::Config("Instruction cannot be empty".into()));
        }

        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonRpcCodec::new()));
        let ids = self.ids.unwrap_or_else(|| Arc::new(UuidV7Ids));

        tracing::debug!(
            transform = transform.name(),
            timeout_ms = self.config.timeout.as_millis() as u64,
            max_retries = self.config.max_retries,
            "Building agent service"
        );

        let service = A2AAgentService::new(TaskManager::new(transform, ids, self.config), codec);
        Ok(match self.card {
            Some(card) => service.with_agent_card(card),
            None => service,
        })
    }
}

impl<T: TextTransform> Default for A2AAgentBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl A2AAgentBuilder<GeminiTransform> {
    /// Create a builder backed by the Gemini API
    pub fn new_gemini(config: GeminiConfig) -> Result<Self, A2AError> {
        Ok(Self::new().with_transform(GeminiTransform::new(config)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::{agent::ids::SequentialIds, transform::mock::MockTransform};

    use super::*;

    #[test]
    fn test_builder_requires_transform() {
        let result = A2AAgentBuilder::<MockTransform>::new().build();
        assert!(matches!(result, Err(A2AError::Config(_))));
    }

    #[test]
    fn test_builder_with_mock_transform() {
        let service = A2AAgentBuilder::new()
            .with_transform(MockTransform::replying("ok"))
            .with_id_generator(SequentialIds::new("fixture"))
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(2)
            .build()
            .unwrap();

        assert_eq!(service.manager().config().timeout, Duration::from_secs(5));
        assert_eq!(service.manager().config().max_retries, 2);
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = A2AAgentBuilder::new()
            .with_transform(MockTransform::replying("ok"))
            .with_timeout(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_blank_instruction() {
        let result = A2AAgentBuilder::new()
            .with_transform(MockTransform::replying("ok"))
            .with_config(AgentConfig::new().with_instruction("   "))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_gemini() {
        let config = GeminiConfig::new("test-key").unwrap();
        let service = A2AAgentBuilder::new_gemini(config)
            .unwrap()
            .with_agent_card(AgentCard::simplifier(
                "https://agent.example.com/a2a/optimizer".parse().unwrap(),
            ))
            .build();

        assert!(service.is_ok());
    }
}
