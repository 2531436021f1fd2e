//! Task — the stateful unit of work in the A2A protocol.
//!
//! A Task tracks an interaction between a client and a remote agent across
//! one or more messages. Its state moves along a mostly linear lifecycle:
//!
//! ```text
//! submitted → working → completed | canceled | failed | rejected   (terminal)
//!                    ⇄ input-required
//! submitted | working → auth-required | unknown
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::artifact::Artifact;
use crate::kinds::{ArtifactUpdateKind, Metadata, StatusUpdateKind, TaskKind};
use crate::message::Message;

/// A Task — the fundamental unit of work in A2A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for this task.
    pub id: String,

    /// Server-generated id grouping related tasks and messages.
    pub context_id: String,

    /// Current status of the task.
    pub status: TaskStatus,

    /// Messages exchanged during the task, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,

    /// Artifacts produced by the task.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    /// Extension metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Always `"task"`.
    pub kind: TaskKind,
}

impl Task {
    /// Create a freshly submitted task with a generated id.
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            context_id: context_id.into(),
            status: TaskStatus::now(TaskState::Submitted),
            history: Vec::new(),
            artifacts: Vec::new(),
            metadata: None,
            kind: TaskKind::Task,
        }
    }

    /// Current state.
    pub fn state(&self) -> TaskState {
        self.status.state
    }

    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Check if the task is in an interrupted state (needs input or auth).
    pub fn is_interrupted(&self) -> bool {
        self.status.state.is_interrupted()
    }

    /// Replace the status as a whole. A terminal task keeps its status.
    pub fn update_status(&mut self, status: TaskStatus) -> Result<(), InvalidTransition> {
        if self.is_terminal() {
            return Err(InvalidTransition {
                from: self.status.state,
                to: status.state,
            });
        }
        self.status = status;
        Ok(())
    }

    /// Move to a new state, stamped with the current time.
    pub fn transition(&mut self, state: TaskState) -> Result<(), InvalidTransition> {
        self.update_status(TaskStatus::now(state))
    }

    /// Append a message to the history.
    pub fn add_message(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Add an artifact to the task.
    pub fn add_artifact(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }
}

/// A task state together with an optional status message and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub state: TaskState,

    /// Additional status update for the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// When the status was recorded, as sent (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TaskStatus {
    /// A status with no message and no timestamp.
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
            timestamp: None,
        }
    }

    /// A status stamped with the current time.
    pub fn now(state: TaskState) -> Self {
        Self {
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            ..Self::new(state)
        }
    }

    /// The timestamp as a UTC instant. A timestamp without an offset is
    /// read as UTC; one that is not ISO 8601 at all yields `None`.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Utc));
        }
        raw.parse::<NaiveDateTime>().ok().map(|at| at.and_utc())
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }
}

/// The state of a task in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Received but not yet started.
    Submitted,

    /// Actively being worked on.
    Working,

    /// Paused, waiting for additional input from the client.
    InputRequired,

    /// Completed successfully (terminal).
    Completed,

    /// Canceled by the client (terminal).
    Canceled,

    /// Failed (terminal).
    Failed,

    /// Rejected by the remote agent (terminal).
    Rejected,

    /// Paused, waiting for authentication/authorization.
    AuthRequired,

    /// State could not be determined.
    Unknown,
}

impl TaskState {
    pub const ALL: [TaskState; 9] = [
        TaskState::Submitted,
        TaskState::Working,
        TaskState::InputRequired,
        TaskState::Completed,
        TaskState::Canceled,
        TaskState::Failed,
        TaskState::Rejected,
        TaskState::AuthRequired,
        TaskState::Unknown,
    ];

    /// The wire literal.
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Canceled => "canceled",
            TaskState::Failed => "failed",
            TaskState::Rejected => "rejected",
            TaskState::AuthRequired => "auth-required",
            TaskState::Unknown => "unknown",
        }
    }

    /// Completed, canceled, failed or rejected.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed | TaskState::Rejected
        )
    }

    /// Input-required or auth-required.
    pub const fn is_interrupted(self) -> bool {
        matches!(self, TaskState::InputRequired | TaskState::AuthRequired)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskState {
    type Err = UnknownTaskState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownTaskState(s.to_string()))
    }
}

/// A string that is not one of the task state literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task state `{0}`")]
pub struct UnknownTaskState(pub String);

/// Error for a status change on a task that already reached a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid task transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: TaskState,
    pub to: TaskState,
}

/// Sent by the agent during `message/stream` or `tasks/resubscribe` when the
/// task status changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    pub task_id: String,

    pub context_id: String,

    /// Always `"status-update"`.
    pub kind: StatusUpdateKind,

    pub status: TaskStatus,

    /// Marks the end of the event stream for this task.
    #[serde(rename = "final")]
    pub is_final: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl TaskStatusUpdateEvent {
    pub fn new(task: &Task, is_final: bool) -> Self {
        Self {
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            kind: StatusUpdateKind::StatusUpdate,
            status: task.status.clone(),
            is_final,
            metadata: None,
        }
    }
}

/// Sent by the agent during `message/stream` or `tasks/resubscribe` when an
/// artifact is produced or extended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskArtifactUpdateEvent {
    pub task_id: String,

    pub context_id: String,

    /// Always `"artifact-update"`.
    pub kind: ArtifactUpdateKind,

    pub artifact: Artifact,

    /// Append to a previously sent artifact with the same id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,

    /// This is the last chunk of the artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_chunk: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl TaskArtifactUpdateEvent {
    pub fn new(task: &Task, artifact: Artifact) -> Self {
        Self {
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            kind: ArtifactUpdateKind::ArtifactUpdate,
            artifact,
            append: None,
            last_chunk: None,
            metadata: None,
        }
    }
}

/// Parameters containing only a task id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskIdParams {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl TaskIdParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: None,
        }
    }
}

/// Parameters for `tasks/get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryParams {
    pub id: String,

    /// Number of most recent history messages to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_lifecycle() {
        let mut task = Task::new("ctx-1");
        assert_eq!(task.state(), TaskState::Submitted);
        assert!(!task.is_terminal());

        task.transition(TaskState::Working).unwrap();
        assert_eq!(task.state(), TaskState::Working);

        task.transition(TaskState::InputRequired).unwrap();
        assert!(task.is_interrupted());

        task.transition(TaskState::Working).unwrap();
        task.transition(TaskState::Completed).unwrap();
        assert!(task.is_terminal());

        // Cannot transition from terminal state
        let err = task.transition(TaskState::Working).unwrap_err();
        assert_eq!(err.to_string(), "invalid task transition from completed to working");
    }

    #[test]
    fn test_state_literals() {
        let literals: Vec<String> = TaskState::ALL
            .iter()
            .map(|s| serde_json::to_value(s).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            literals,
            [
                "submitted",
                "working",
                "input-required",
                "completed",
                "canceled",
                "failed",
                "rejected",
                "auth-required",
                "unknown"
            ]
        );
        for state in TaskState::ALL {
            assert_eq!(state.as_str().parse::<TaskState>().unwrap(), state);
        }
        assert!("not-a-state".parse::<TaskState>().is_err());
    }

    #[test]
    fn test_only_four_states_are_terminal() {
        let terminal: Vec<_> = TaskState::ALL.into_iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(
            terminal,
            [
                TaskState::Completed,
                TaskState::Canceled,
                TaskState::Failed,
                TaskState::Rejected
            ]
        );
    }

    #[test]
    fn test_task_serialization() {
        let mut task = Task::new("ctx-1");
        task.add_message(Message::user_text("hello"));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["kind"], "task");
        assert_eq!(json["status"]["state"], "submitted");
        assert_eq!(json["history"][0]["kind"], "message");
        assert!(json.get("artifacts").is_none());

        let parsed: Task = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn test_status_timestamp_keeps_wire_text() {
        for raw in [
            "2023-10-27T10:00:00",
            "2023-10-27T12:00:00+02:00",
            "2023-10-27T10:00:00.000Z",
        ] {
            let status: TaskStatus =
                serde_json::from_value(serde_json::json!({"state": "working", "timestamp": raw}))
                    .unwrap();
            assert_eq!(serde_json::to_value(&status).unwrap()["timestamp"], raw);
            assert_eq!(
                status.timestamp_utc().unwrap().to_rfc3339(),
                "2023-10-27T10:00:00+00:00"
            );
        }

        let stamped = TaskStatus::now(TaskState::Working);
        assert!(stamped.timestamp_utc().is_some());

        let mut garbled = TaskStatus::new(TaskState::Working);
        garbled.timestamp = Some("yesterday".into());
        assert_eq!(garbled.timestamp_utc(), None);
    }

    #[test]
    fn test_status_event_final_flag() {
        let task = Task::new("ctx-9");
        let event = TaskStatusUpdateEvent::new(&task, true);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["final"], true);
        assert_eq!(json["kind"], "status-update");
        assert_eq!(json["contextId"], "ctx-9");
    }
}
