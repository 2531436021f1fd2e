//! Artifact — outputs produced by an agent while working on a task.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kinds::Metadata;
use crate::message::{text_of, Part};

/// An artifact produced by a task.
///
/// Artifacts contain the deliverables — the actual results of the agent's work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Identifier, unique within the owning task.
    pub artifact_id: String,

    /// Human-readable name/title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description of what this artifact contains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The content parts of this artifact.
    pub parts: Vec<Part>,

    /// Extension metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// URIs of the extensions relevant to this artifact.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
}

impl Artifact {
    /// Create a new artifact with text content.
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::from_parts(name, vec![Part::text(content)])
    }

    /// Create a new artifact with structured data.
    pub fn data(name: impl Into<String>, value: Metadata) -> Self {
        Self::from_parts(name, vec![Part::data(value)])
    }

    fn from_parts(name: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            artifact_id: Uuid::new_v4().to_string(),
            name: Some(name.into()),
            description: None,
            parts,
            metadata: None,
            extensions: Vec::new(),
        }
    }

    /// Extract text content from this artifact.
    pub fn text_content(&self) -> String {
        text_of(&self.parts)
    }
}
