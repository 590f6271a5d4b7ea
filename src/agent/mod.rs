//! Agent assembly: configuration, id generation and the builder

pub mod builder;
pub mod config;
pub mod ids;

pub use builder::A2AAgentBuilder;
pub use config::{AgentConfig, DEFAULT_INSTRUCTION};
pub use ids::{IdGenerator, SequentialIds, UuidV7Ids};
