//! Message — one turn of a conversation between a client and an agent.
//!
//! A Message contains one or more Parts (text, file, or structured data)
//! and has a role indicating whether it's from the user (client) or the
//! remote agent.

use base64::Engine;
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::kinds::{MessageKind, Metadata};

/// A message exchanged between a client and an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Role of the sender.
    pub role: Role,

    /// Content parts of the message, in order.
    pub parts: Vec<Part>,

    /// Extension metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// URIs of the extensions present in or contributing to this message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,

    /// Other tasks this message refers to for additional context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_task_ids: Vec<String>,

    /// Identifier created by the message creator.
    pub message_id: String,

    /// Task this message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Context this message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Always `"message"`.
    pub kind: MessageKind,
}

impl Message {
    /// Create a message from the user (client).
    pub fn user(parts: Vec<Part>) -> Self {
        Self::with_role(Role::User, parts)
    }

    /// Create a message from the remote agent.
    pub fn agent(parts: Vec<Part>) -> Self {
        Self::with_role(Role::Agent, parts)
    }

    fn with_role(role: Role, parts: Vec<Part>) -> Self {
        Self {
            role,
            parts,
            metadata: None,
            extensions: Vec::new(),
            reference_task_ids: Vec::new(),
            message_id: Uuid::new_v4().to_string(),
            task_id: None,
            context_id: None,
            kind: MessageKind::Message,
        }
    }

    /// Convenience: create a user message with a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![Part::text(text)])
    }

    /// Convenience: create an agent message with a single text part.
    pub fn agent_text(text: impl Into<String>) -> Self {
        Self::agent(vec![Part::text(text)])
    }

    /// Attach the message to an existing task and context.
    pub fn in_task(mut self, task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self.context_id = Some(context_id.into());
        self
    }

    /// Extract all text content from this message.
    pub fn text_content(&self) -> String {
        text_of(&self.parts)
    }
}

/// Join the text parts of a part list with newlines.
pub(crate) fn text_of(parts: &[Part]) -> String {
    parts
        .iter()
        .filter_map(|p| match p {
            Part::Text(TextPart { text, .. }) => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The client.
    User,
    /// The remote agent.
    Agent,
}

/// A part of a message or artifact, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    /// Plain text content.
    Text(TextPart),

    /// File content, inline or by reference.
    File(FilePart),

    /// Structured key-value content.
    Data(DataPart),
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart {
            text: text.into(),
            metadata: None,
        })
    }

    /// Create a file part from inline bytes.
    pub fn file_inline(name: impl Into<String>, mime_type: impl Into<String>, data: &[u8]) -> Self {
        Self::File(FilePart {
            file: FileContent::Bytes(FileWithBytes {
                bytes: base64::engine::general_purpose::STANDARD.encode(data),
                name: Some(name.into()),
                mime_type: Some(mime_type.into()),
            }),
            metadata: None,
        })
    }

    /// Create a file part from a URI reference.
    pub fn file_uri(uri: impl Into<String>, name: Option<String>) -> Self {
        Self::File(FilePart {
            file: FileContent::Uri(FileWithUri {
                uri: uri.into(),
                name,
                mime_type: None,
            }),
            metadata: None,
        })
    }

    /// Create a structured data part.
    pub fn data(data: Metadata) -> Self {
        Self::Data(DataPart {
            data,
            metadata: None,
        })
    }

    /// The `kind` literal of this part.
    pub fn kind(&self) -> &'static str {
        match self {
            Part::Text(_) => "text",
            Part::File(_) => "file",
            Part::Data(_) => "data",
        }
    }
}

/// A text segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextPart {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// A file segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilePart {
    pub file: FileContent,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// A structured data segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataPart {
    pub data: Metadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// File content: base64 `bytes` or a `uri`, never both and never neither.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum FileContent {
    Bytes(FileWithBytes),
    Uri(FileWithUri),
}

impl FileContent {
    pub fn name(&self) -> Option<&str> {
        match self {
            FileContent::Bytes(f) => f.name.as_deref(),
            FileContent::Uri(f) => f.name.as_deref(),
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            FileContent::Bytes(f) => f.mime_type.as_deref(),
            FileContent::Uri(f) => f.mime_type.as_deref(),
        }
    }
}

impl<'de> Deserialize<'de> for FileContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(de::Error::custom("file must be an object"));
        }
        let present = |key: &str| value.get(key).is_some_and(|v| !v.is_null());
        let (has_bytes, has_uri) = (present("bytes"), present("uri"));

        match (has_bytes, has_uri) {
            (true, false) => serde_json::from_value(value)
                .map(FileContent::Bytes)
                .map_err(de::Error::custom),
            (false, true) => serde_json::from_value(value)
                .map(FileContent::Uri)
                .map_err(de::Error::custom),
            (true, true) => Err(de::Error::custom(
                "file must carry exactly one of `bytes` or `uri`, found both",
            )),
            (false, false) => Err(de::Error::custom(
                "file must carry exactly one of `bytes` or `uri`, found neither",
            )),
        }
    }
}

/// A file whose content travels inline as base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileWithBytes {
    /// Base64-encoded file content.
    pub bytes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileWithBytes {
    /// Decode the inline content.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.bytes)
    }
}

/// A file whose content lives at a URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileWithUri {
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}
