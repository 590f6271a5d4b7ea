//! A2A task types and lifecycle management

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{error::A2AError, message::Message, Artifact};

/// A task in the A2A protocol
///
/// A task is the server-side record of one request's processing. It is
/// created per request, moves from submitted to a terminal state and is
/// serialized into the response. Tasks are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Context the task belongs to
    #[serde(rename = "contextId")]
    pub context_id: String,

    /// Current status of the task
    pub status: TaskStatus,

    /// Outputs produced by the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    /// Messages exchanged while processing the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,

    /// Object discriminator, always "task"
    #[serde(default = "Task::default_kind")]
    pub kind: String,
}

impl Task {
    /// Create a new task in the submitted state
    pub fn new(id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context_id: context_id.into(),
            status: TaskStatus::new(TaskState::Submitted),
            artifacts: Vec::new(),
            history: Vec::new(),
            kind: Self::default_kind(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> TaskState {
        self.status.state
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Move the task to `to`, refreshing the status timestamp
    ///
    /// The status message is cleared; use [`Task::complete`] to attach one.
    pub fn transition(mut self, to: TaskState) -> Result<Self, A2AError> {
        let from = self.status.state;
        if !from.can_transition_to(to) {
            return Err(A2AError::Internal(format!(
                "illegal task transition {} -> {} for task {}",
                from, to, self.id
            )));
        }

        self.status = TaskStatus::new(to);
        Ok(self)
    }

    /// Mark the task as working
    pub fn start(self) -> Result<Self, A2AError> {
        self.transition(TaskState::Working)
    }

    /// Mark the task as completed with the agent's reply
    pub fn complete(self, reply: Message) -> Result<Self, A2AError> {
        let mut task = self.transition(TaskState::Completed)?;
        task.status.message = Some(reply);
        Ok(task)
    }

    /// Mark the task as failed. No result message is attached.
    pub fn fail(self) -> Result<Self, A2AError> {
        self.transition(TaskState::Failed)
    }

    /// Add an artifact to the task
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Append messages to the task history
    pub fn with_history(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.history.extend(messages);
        self
    }

    fn default_kind() -> String {
        "task".to_string()
    }
}

/// Status of a task: its state, an optional message and when it was set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// Result message (present when the task completed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// When the state was entered (RFC 3339)
    pub timestamp: String,
}

impl TaskStatus {
    /// Create a status for `state` stamped with the current time
    pub fn new(state: TaskState) -> Self {
        Self::at(state, Utc::now())
    }

    /// Create a status for `state` stamped with `at`
    pub fn at(state: TaskState, at: DateTime<Utc>) -> Self {
        Self {
            state,
            message: None,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Task state in the A2A protocol lifecycle
///
/// submitted → working → completed | failed, or submitted → failed when a
/// task is abandoned before dispatch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been received
    Submitted,

    /// Task is handed to the text transform
    Working,

    /// Task completed successfully
    Completed,

    /// Task failed with an error
    Failed,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }

    /// Whether the lifecycle allows moving from `self` to `to`
    pub fn can_transition_to(&self, to: TaskState) -> bool {
        matches!(
            (self, to),
            (TaskState::Submitted, TaskState::Working)
                | (TaskState::Submitted, TaskState::Failed)
                | (TaskState::Working, TaskState::Completed)
                | (TaskState::Working, TaskState::Failed)
        )
    }

    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("task-123", "ctx-1");

        assert_eq!(task.id, "task-123");
        assert_eq!(task.context_id, "ctx-1");
        assert_eq!(task.state(), TaskState::Submitted);
        assert!(task.status.message.is_none());
        assert!(!task.is_terminal());
    }

    #[test]
    fn test_task_lifecycle() {
        let task = Task::new("task-123", "ctx-1").start().unwrap();
        assert_eq!(task.state(), TaskState::Working);

        let task = task.complete(Message::agent("done")).unwrap();
        assert_eq!(task.state(), TaskState::Completed);
        assert!(task.is_terminal());
        assert_eq!(task.status.message, Some(Message::agent("done")));
    }

    #[test]
    fn test_task_fails_from_submitted_or_working() {
        let task = Task::new("a", "ctx").fail().unwrap();
        assert_eq!(task.state(), TaskState::Failed);

        let task = Task::new("b", "ctx").start().unwrap().fail().unwrap();
        assert_eq!(task.state(), TaskState::Failed);
        assert!(task.status.message.is_none());
    }

    #[test]
    fn test_illegal_transitions() {
        let err = Task::new("a", "ctx")
            .complete(Message::agent("too early"))
            .unwrap_err();
        assert!(matches!(err, A2AError::Internal(_)));

        let done = Task::new("b", "ctx")
            .start()
            .unwrap()
            .complete(Message::agent("ok"))
            .unwrap();
        assert!(done.clone().fail().is_err());
        assert!(done.start().is_err());
    }

    #[test]
    fn test_task_state() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::Working.can_transition_to(TaskState::Submitted));
    }

    #[test]
    fn test_task_serialization() {
        let at = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut task = Task::new("task-123", "ctx-9");
        task.status = TaskStatus::at(TaskState::Working, at);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "task-123");
        assert_eq!(json["contextId"], "ctx-9");
        assert_eq!(json["status"]["state"], "working");
        assert_eq!(json["status"]["timestamp"], "2025-01-01T00:00:00.000Z");
        assert_eq!(json["kind"], "task");
        assert!(json.get("artifacts").is_none());
        assert!(json.get("history").is_none());
    }
}
