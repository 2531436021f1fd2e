//! Literal discriminants carried by the protocol's tagged objects.
//!
//! Each marker is a single-variant enum so that decoding rejects any other
//! literal, while constructors can fill the field with `Default::default()`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Open-ended extension metadata attached to most entities.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// `kind: "task"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TaskKind {
    #[default]
    #[serde(rename = "task")]
    Task,
}

/// `kind: "message"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MessageKind {
    #[default]
    #[serde(rename = "message")]
    Message,
}

/// `kind: "status-update"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StatusUpdateKind {
    #[default]
    #[serde(rename = "status-update")]
    StatusUpdate,
}

/// `kind: "artifact-update"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ArtifactUpdateKind {
    #[default]
    #[serde(rename = "artifact-update")]
    ArtifactUpdate,
}

/// Every `kind` value that may open a streamed or send-message result.
pub const RESULT_KINDS: [&str; 4] = ["task", "message", "status-update", "artifact-update"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_literals() {
        assert_eq!(serde_json::to_string(&TaskKind::Task).unwrap(), "\"task\"");
        assert_eq!(
            serde_json::to_string(&StatusUpdateKind::default()).unwrap(),
            "\"status-update\""
        );
        assert!(serde_json::from_str::<MessageKind>("\"task\"").is_err());
        assert!(serde_json::from_str::<ArtifactUpdateKind>("\"artifact-update\"").is_ok());
    }
}
