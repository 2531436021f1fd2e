//! JSON-RPC 2.0 transport binding for A2A.
//!
//! The primary wire protocol for A2A. All operations are encoded as
//! JSON-RPC 2.0 requests/responses over HTTP(S). A response carries exactly
//! one of `result` or `error`; [`JsonRpcResponse`] makes the other state
//! unrepresentable.

use std::fmt;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{A2AError, A2AResult};

/// JSON-RPC 2.0 protocol version.
pub const JSONRPC_VERSION: &str = "2.0";

// ── A2A Methods ──────────────────────────────────────────────

/// Standard A2A JSON-RPC method names.
pub mod methods {
    /// Send a message to the agent (creates or continues a task).
    pub const SEND_MESSAGE: &str = "message/send";

    /// Send a streaming message (returns SSE stream).
    pub const SEND_STREAMING_MESSAGE: &str = "message/stream";

    /// Get a task by ID.
    pub const GET_TASK: &str = "tasks/get";

    /// Cancel a task.
    pub const CANCEL_TASK: &str = "tasks/cancel";

    /// Set a push notification config.
    pub const SET_TASK_PUSH_NOTIFICATION_CONFIG: &str = "tasks/pushNotificationConfig/set";

    /// Get a push notification config.
    pub const GET_TASK_PUSH_NOTIFICATION_CONFIG: &str = "tasks/pushNotificationConfig/get";

    /// List push notification configs for a task.
    pub const LIST_TASK_PUSH_NOTIFICATION_CONFIG: &str = "tasks/pushNotificationConfig/list";

    /// Delete a push notification config.
    pub const DELETE_TASK_PUSH_NOTIFICATION_CONFIG: &str = "tasks/pushNotificationConfig/delete";

    /// Re-subscribe to the event stream of an existing task.
    pub const RESUBSCRIBE_TASK: &str = "tasks/resubscribe";
}

/// The `jsonrpc` literal of typed envelopes. Anything but `"2.0"` fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum JsonRpcVersion {
    #[default]
    #[serde(rename = "2.0")]
    V2,
}

// ── JSON-RPC Request ─────────────────────────────────────────

/// A JSON-RPC 2.0 request envelope with untyped params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JsonRpcRequest {
    /// Must be "2.0".
    pub jsonrpc: String,

    /// The method to invoke.
    pub method: String,

    /// Method parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Request identifier (used to match response).
    pub id: RequestId,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC request.
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Whether the envelope declares version 2.0.
    pub fn is_v2(&self) -> bool {
        self.jsonrpc == JSONRPC_VERSION
    }
}

// ── JSON-RPC Response ────────────────────────────────────────

/// A successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JsonRpcSuccessResponse<T> {
    pub jsonrpc: JsonRpcVersion,

    /// The id of the request being answered. Only error responses may
    /// leave it null.
    pub id: RequestId,

    pub result: T,
}

/// An error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: JsonRpcVersion,

    /// The id of the request being answered; null when it could not be read.
    #[serde(default)]
    pub id: Option<RequestId>,

    pub error: A2AError,
}

impl JsonRpcErrorResponse {
    pub fn new(id: Option<RequestId>, error: A2AError) -> Self {
        Self {
            jsonrpc: JsonRpcVersion::V2,
            id,
            error,
        }
    }
}

/// A JSON-RPC 2.0 response: success or error, never both.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum JsonRpcResponse<T> {
    Success(JsonRpcSuccessResponse<T>),
    Error(JsonRpcErrorResponse),
}

impl<T> JsonRpcResponse<T> {
    /// Create a success response.
    pub fn success(id: RequestId, result: T) -> Self {
        Self::Success(JsonRpcSuccessResponse {
            jsonrpc: JsonRpcVersion::V2,
            id,
            result,
        })
    }

    /// Create an error response.
    pub fn error(id: Option<RequestId>, error: A2AError) -> Self {
        Self::Error(JsonRpcErrorResponse::new(id, error))
    }

    pub fn id(&self) -> Option<&RequestId> {
        match self {
            JsonRpcResponse::Success(r) => Some(&r.id),
            JsonRpcResponse::Error(r) => r.id.as_ref(),
        }
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcResponse::Error(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            JsonRpcResponse::Success(r) => Some(&r.result),
            JsonRpcResponse::Error(_) => None,
        }
    }

    pub fn error_value(&self) -> Option<&A2AError> {
        match self {
            JsonRpcResponse::Success(_) => None,
            JsonRpcResponse::Error(r) => Some(&r.error),
        }
    }

    /// Extract the result, returning the error if this is an error response.
    pub fn into_result(self) -> A2AResult<T> {
        match self {
            JsonRpcResponse::Success(r) => Ok(r.result),
            JsonRpcResponse::Error(r) => Err(r.error),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for JsonRpcResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let Some(object) = value.as_object() else {
            return Err(de::Error::custom("response must be an object"));
        };
        // `error: null` is how some servers spell "no error"
        let has_result = object.contains_key("result");
        let has_error = object.get("error").is_some_and(|e| !e.is_null());

        match (has_result, has_error) {
            (true, false) => serde_json::from_value(value)
                .map(JsonRpcResponse::Success)
                .map_err(de::Error::custom),
            (false, true) => serde_json::from_value(value)
                .map(JsonRpcResponse::Error)
                .map_err(de::Error::custom),
            (true, true) => Err(de::Error::custom(
                "response must carry exactly one of `result` or `error`, found both",
            )),
            (false, false) => Err(de::Error::custom(
                "response must carry exactly one of `result` or `error`, found neither",
            )),
        }
    }
}

// ── JSON-RPC Error ───────────────────────────────────────────

/// A JSON-RPC 2.0 error object as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Error)]
#[error("JSON-RPC error {code}: {message}")]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,

    /// Human-readable error message.
    pub message: String,

    /// Optional additional data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonSchema for A2AError {
    fn schema_name() -> String {
        "A2AError".into()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        JsonRpcError::json_schema(gen)
    }
}

// ── Request ID ───────────────────────────────────────────────

/// JSON-RPC request identifier (can be a number or string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl RequestId {
    /// A fresh random string id.
    pub fn random() -> Self {
        RequestId::String(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

/// Best-effort read of `id` from an envelope that may not decode, so an error
/// response can still echo it.
pub fn peek_request_id(value: &Value) -> Option<RequestId> {
    value
        .get("id")
        .and_then(|id| RequestId::deserialize(id).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let req = JsonRpcRequest::new(
            RequestId::Number(7),
            methods::SEND_MESSAGE,
            Some(json!({"message": {"role": "user"}})),
        );

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("message/send"));
        assert!(json.contains("2.0"));

        let parsed: JsonRpcRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.method, "message/send");
        assert!(parsed.is_v2());
    }

    #[test]
    fn test_response_success() {
        let resp = JsonRpcResponse::success(RequestId::Number(1), json!({"id": "abc123"}));
        assert!(!resp.is_error());
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("error").is_none());
        assert!(resp.into_result().is_ok());
    }

    #[test]
    fn test_response_error() {
        let resp: JsonRpcResponse<Value> =
            JsonRpcResponse::error(Some(RequestId::Number(1)), A2AError::task_not_found("abc123"));
        assert!(resp.is_error());
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("result").is_none());
        assert_eq!(json["error"]["code"], -32001);
        assert!(resp.into_result().is_err());
    }

    #[test]
    fn test_result_and_error_are_exclusive() {
        let both = json!({
            "jsonrpc": "2.0", "id": 1, "result": {},
            "error": {"code": -32603, "message": "Internal error"}
        });
        assert!(serde_json::from_value::<JsonRpcResponse<Value>>(both).is_err());

        let neither = json!({"jsonrpc": "2.0", "id": 1});
        assert!(serde_json::from_value::<JsonRpcResponse<Value>>(neither).is_err());

        let null_error = json!({"jsonrpc": "2.0", "id": 1, "result": 5, "error": null});
        let parsed: JsonRpcResponse<i64> = serde_json::from_value(null_error).unwrap();
        assert_eq!(parsed.result(), Some(&5));
    }

    #[test]
    fn test_error_response_decodes_taxonomy() {
        let raw = json!({
            "jsonrpc": "2.0", "id": 1,
            "error": {"code": -32001, "message": "Task not found"}
        });
        let parsed: JsonRpcResponse<Value> = serde_json::from_value(raw).unwrap();
        let err = parsed.error_value().unwrap();
        assert_eq!(err.code(), ErrorCode::TaskNotFound);
        assert_eq!(err.message(), "Task not found");
        assert_eq!(parsed.id(), Some(&RequestId::Number(1)));
    }

    #[test]
    fn test_success_requires_request_id() {
        let missing = json!({"jsonrpc": "2.0", "result": 5});
        assert!(serde_json::from_value::<JsonRpcResponse<i64>>(missing).is_err());

        let null = json!({"jsonrpc": "2.0", "id": null, "result": 5});
        assert!(serde_json::from_value::<JsonRpcResponse<i64>>(null).is_err());

        let unreadable = json!({
            "jsonrpc": "2.0", "id": null,
            "error": {"code": -32700, "message": "Invalid JSON payload"}
        });
        let parsed: JsonRpcResponse<i64> = serde_json::from_value(unreadable).unwrap();
        assert_eq!(parsed.id(), None);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let raw = json!({"jsonrpc": "1.0", "id": 1, "result": null});
        assert!(serde_json::from_value::<JsonRpcResponse<Value>>(raw).is_err());
    }

    #[test]
    fn test_null_id_round_trips() {
        let resp: JsonRpcResponse<()> = JsonRpcResponse::error(None, A2AError::parse_error("eof"));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], Value::Null);
        assert_eq!(peek_request_id(&json!({"id": "r1"})), Some(RequestId::from("r1")));
        assert_eq!(peek_request_id(&json!({"id": [1]})), None);
    }
}
