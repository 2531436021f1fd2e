//! # a2a-schema
//!
//! Typed data model and validator for the Agent-to-Agent (A2A) protocol — the
//! open standard for agent interoperability.
//!
//! A2A lets agents describe themselves with an [`AgentCard`] and exchange
//! task-oriented messages over JSON-RPC 2.0. This crate holds no runtime: it
//! decodes untrusted JSON into typed values, rejects what does not conform
//! with the matching protocol error, and encodes typed values back.
//!
//! ## Layers
//!
//! 1. **Data model** — cards, tasks, messages, parts, artifacts, push configs
//! 2. **Envelope** — JSON-RPC requests and responses bound per method
//! 3. **Rules** — [`Validate`] checks beyond shape, tuned by [`ValidationConfig`]
//!
//! ## Quick Start
//!
//! ```rust
//! use a2a_schema::{A2ARequest, Codec, ErrorCode, Method};
//!
//! let codec = Codec::default();
//! let request = codec
//!     .decode_request(r#"{
//!         "jsonrpc": "2.0", "id": "r1", "method": "message/send",
//!         "params": {"message": {
//!             "role": "user", "kind": "message", "messageId": "m1",
//!             "parts": [{"kind": "text", "text": "hi"}]
//!         }}
//!     }"#)
//!     .unwrap();
//! assert_eq!(request.method(), Method::SendMessage);
//!
//! let rejected = codec
//!     .decode_request(r#"{"jsonrpc": "2.0", "id": 2, "method": "tasks/get", "params": {}}"#)
//!     .unwrap_err();
//! assert_eq!(rejected.error.code(), ErrorCode::InvalidParams);
//! ```

pub mod agent_card;
pub mod artifact;
pub mod codec;
pub mod config;
pub mod error;
pub mod kinds;
pub mod message;
pub mod notification;
pub mod request;
pub mod response;
pub mod security;
pub mod task;
pub mod transport;
pub mod validate;

// Re-export primary types
pub use agent_card::{
    AgentCapabilities, AgentCard, AgentCardSignature, AgentExtension, AgentInterface,
    AgentProvider, AgentSkill, SecurityRequirement, TransportProtocol, PROTOCOL_VERSION,
};
pub use artifact::Artifact;
pub use codec::Codec;
pub use config::{ConfigError, SupersededShapePolicy, ValidationConfig};
pub use error::{A2AError, A2AResult, ErrorCode};
pub use kinds::Metadata;
pub use message::{
    DataPart, FileContent, FilePart, FileWithBytes, FileWithUri, Message, Part, Role, TextPart,
};
pub use notification::{
    DeleteTaskPushNotificationConfigParams, GetTaskPushNotificationConfigParams,
    ListTaskPushNotificationConfigParams, PushNotificationAuthenticationInfo,
    PushNotificationConfig, TaskPushNotificationConfig,
};
pub use request::{A2ARequest, MessageSendConfiguration, MessageSendParams, Method, Request};
pub use response::{A2AResponse, SendMessageResult};
pub use security::{ApiKeyLocation, OAuthFlows, SecurityScheme};
pub use task::{
    InvalidTransition, Task, TaskArtifactUpdateEvent, TaskIdParams, TaskQueryParams, TaskState,
    TaskStatus, TaskStatusUpdateEvent,
};
pub use transport::jsonrpc::{
    JsonRpcError, JsonRpcErrorResponse, JsonRpcRequest, JsonRpcResponse, JsonRpcSuccessResponse,
    RequestId,
};
pub use transport::stream::{StreamResponse, StreamSequence};
pub use validate::{Validate, Violation};
