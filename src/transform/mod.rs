//! Text transform abstraction for the external completion service

pub mod gemini;
#[cfg(test)]
pub(crate) mod mock;

use std::{sync::Arc, time::Duration};

pub use gemini::{GeminiConfig, GeminiTransform};

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a text transform
///
/// Never sent to callers as is; the task manager translates it into an
/// [`A2AError`](crate::protocol::A2AError) at the call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The provider did not answer in time
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The provider could not be reached or is overloaded
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The provider refused the input; carries a short reason such as `SAFETY`
    #[error("rejected: {0}")]
    Rejected(String),

    /// The provider refused the agent itself (bad credentials, unknown model)
    #[error("misconfigured: {0}")]
    Misconfigured(String),

    /// The provider answered with something that is not a completion
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AdapterError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, AdapterError::Timeout(_) | AdapterError::Unavailable(_))
    }
}

/// Capability to rewrite text following an instruction
///
/// This is the only thing the task manager knows about the completion
/// service, so any provider (or a test double) can sit behind it.
#[async_trait]
pub trait TextTransform: Send + Sync + 'static {
    /// Rewrite `text` following `instruction`
    ///
    /// # Arguments
    ///
    /// * `text` - The user's text
    /// * `instruction` - The agent's fixed directive
    async fn transform(&self, text: &str, instruction: &str) -> Result<String, AdapterError>;

    /// Short provider name for logs
    fn name(&self) -> &str {
        "text-transform"
    }
}

#[async_trait]
impl<T: TextTransform + ?Sized> TextTransform for Arc<T> {
    async fn transform(&self, text: &str, instruction: &str) -> Result<String, AdapterError> {
        (**self).transform(text, instruction).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: TextTransform + ?Sized> TextTransform for Box<T> {
    async fn transform(&self, text: &str, instruction: &str) -> Result<String, AdapterError> {
        (**self).transform(text, instruction).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
