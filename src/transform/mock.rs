use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::transform::{AdapterError, TextTransform};

type Handler = dyn Fn(&str, &str) -> Result<String, AdapterError> + Send + Sync;

/// Mock text transform for internal testing
///
/// Answers from a closure, optionally after a delay, and counts how often
/// it was called.
#[derive(Clone)]
pub(crate) struct MockTransform {
    handler: Arc<Handler>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockTransform {
    /// Create a new mock transform with a custom handler
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, AdapterError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock transform that always answers `reply`
    pub fn replying(reply: &'static str) -> Self {
        Self::new(move |_, _| Ok(reply.to_string()))
    }

    /// Create a mock transform that always fails with `error`
    pub fn failing(error: AdapterError) -> Self {
        Self::new(move |_, _| Err(error.clone()))
    }

    /// Sleep for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextTransform for MockTransform {
    async fn transform(&self, text: &str, instruction: &str) -> Result<String, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(text, instruction)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

impl std::fmt::Debug for MockTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransform")
            .field("calls", &self.calls())
            .finish()
    }
}
