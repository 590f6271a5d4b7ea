//! Tower Service implementation and the task lifecycle it drives

pub mod core;
pub mod lifecycle;
pub mod response;

pub use core::A2AAgentService;
pub use lifecycle::TaskManager;
pub use response::{A2AResponse, ResponseBody};
