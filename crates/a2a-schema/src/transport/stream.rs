//! Streaming results for `message/stream` and `tasks/resubscribe`.
//!
//! Each SSE event carries one JSON-RPC response whose `result` is a
//! [`StreamResponse`]. Events for one task form an ordered sequence closed by
//! a status update with `final: true`; [`StreamSequence`] checks that order.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::kinds::RESULT_KINDS;
use crate::message::Message;
use crate::task::{Task, TaskArtifactUpdateEvent, TaskStatusUpdateEvent};

/// One item of a streamed result, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum StreamResponse {
    Message(Message),
    Task(Task),
    StatusUpdate(TaskStatusUpdateEvent),
    ArtifactUpdate(TaskArtifactUpdateEvent),
}

impl StreamResponse {
    /// The `kind` literal.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamResponse::Message(_) => "message",
            StreamResponse::Task(_) => "task",
            StreamResponse::StatusUpdate(_) => "status-update",
            StreamResponse::ArtifactUpdate(_) => "artifact-update",
        }
    }

    /// The task this item belongs to, if any.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            StreamResponse::Message(m) => m.task_id.as_deref(),
            StreamResponse::Task(t) => Some(&t.id),
            StreamResponse::StatusUpdate(e) => Some(&e.task_id),
            StreamResponse::ArtifactUpdate(e) => Some(&e.task_id),
        }
    }

    /// Whether this item closes its task's stream.
    pub fn is_final(&self) -> bool {
        matches!(self, StreamResponse::StatusUpdate(e) if e.is_final)
    }
}

impl<'de> Deserialize<'de> for StreamResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| de::Error::missing_field("kind"))?;

        let decoded = match kind.as_str() {
            "message" => serde_json::from_value(value).map(StreamResponse::Message),
            "task" => serde_json::from_value(value).map(StreamResponse::Task),
            "status-update" => serde_json::from_value(value).map(StreamResponse::StatusUpdate),
            "artifact-update" => serde_json::from_value(value).map(StreamResponse::ArtifactUpdate),
            other => return Err(de::Error::unknown_variant(other, &RESULT_KINDS)),
        };
        decoded.map_err(de::Error::custom)
    }
}

impl From<Message> for StreamResponse {
    fn from(message: Message) -> Self {
        StreamResponse::Message(message)
    }
}

impl From<Task> for StreamResponse {
    fn from(task: Task) -> Self {
        StreamResponse::Task(task)
    }
}

impl From<TaskStatusUpdateEvent> for StreamResponse {
    fn from(event: TaskStatusUpdateEvent) -> Self {
        StreamResponse::StatusUpdate(event)
    }
}

impl From<TaskArtifactUpdateEvent> for StreamResponse {
    fn from(event: TaskArtifactUpdateEvent) -> Self {
        StreamResponse::ArtifactUpdate(event)
    }
}

/// Split an SSE body into the payloads of its events.
///
/// Consecutive `data:` lines of one event are joined with `\n`; a blank line
/// ends the event. Comments (`:`) and other fields (`event:`, `id:`) are
/// skipped.
pub fn sse_data_payloads(body: &str) -> Vec<String> {
    let mut payloads = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in body.lines() {
        if line.is_empty() {
            if !current.is_empty() {
                payloads.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        if let Some(data) = line.strip_prefix("data:") {
            current.push(data.strip_prefix(' ').unwrap_or(data));
        }
    }
    if !current.is_empty() {
        payloads.push(current.join("\n"));
    }
    payloads
}

/// An out-of-order item in a stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event #{index} ({kind}) for task `{task_id}` arrived after its final status update")]
pub struct StreamOrderError {
    pub index: usize,
    pub kind: &'static str,
    pub task_id: String,
}

/// Tracks which tasks of a stream have already been closed.
#[derive(Debug, Default)]
pub struct StreamSequence {
    finished: HashSet<String>,
    seen: usize,
}

impl StreamSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next item, refusing anything for a task that already ended.
    pub fn push(&mut self, item: &StreamResponse) -> Result<(), StreamOrderError> {
        let index = self.seen;
        self.seen += 1;

        if let Some(task_id) = item.task_id() {
            if self.finished.contains(task_id) {
                return Err(StreamOrderError {
                    index,
                    kind: item.kind(),
                    task_id: task_id.to_string(),
                });
            }
            if item.is_final() {
                debug!(task_id, index, "stream closed for task");
                self.finished.insert(task_id.to_string());
            }
        }
        Ok(())
    }

    /// Whether a final status update was seen for `task_id`.
    pub fn is_finished(&self, task_id: &str) -> bool {
        self.finished.contains(task_id)
    }

    /// Number of items pushed so far.
    pub fn len(&self) -> usize {
        self.seen
    }

    pub fn is_empty(&self) -> bool {
        self.seen == 0
    }
}
