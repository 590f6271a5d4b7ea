//! Agent configuration

use std::time::Duration;

/// Directive given to the text transform with every request
pub const DEFAULT_INSTRUCTION: &str = "Rewrite the following text so a 10-year-old can read it. \
Use short sentences and everyday words. Keep the meaning the same. \
Reply with the rewritten text only.";

/// Configuration for the task lifecycle
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Fixed instruction sent to the text transform; never taken from requests
    pub instruction: String,

    /// Upper bound on the whole text transform call, retries included
    pub timeout: Duration,

    /// Extra attempts after a transient transform failure
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each further retry
    pub retry_backoff: Duration,
}

impl AgentConfig {
    /// Create a configuration with the default instruction and bounds
    pub fn new() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
            retry_backoff: Duration::from_millis(500),
        }
    }

    /// Set the instruction
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial retry backoff
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Backoff before retry number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 0);
        assert!(config.instruction.contains("10-year-old"));
    }

    #[test]
    fn test_backoff_doubles() {
        let config = AgentConfig::new().with_retry_backoff(Duration::from_millis(100));
        assert_eq!(config.backoff_for(1), Duration::from_millis(100));
        assert_eq!(config.backoff_for(2), Duration::from_millis(200));
        assert_eq!(config.backoff_for(3), Duration::from_millis(400));
    }
}
