//! A2A error taxonomy.
//!
//! Every failure that crosses the wire is one of eleven JSON-RPC error codes:
//! five generic JSON-RPC 2.0 codes and six A2A-specific ones. Each code has a
//! fixed default message that is used verbatim unless the caller overrides it,
//! plus optional free-form `data`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::transport::jsonrpc::JsonRpcError;

/// The closed set of error codes defined by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// -32700: the payload is not valid JSON.
    JsonParse,
    /// -32600: the JSON is not a valid request object.
    InvalidRequest,
    /// -32601: the method does not exist.
    MethodNotFound,
    /// -32602: the method parameters are invalid.
    InvalidParams,
    /// -32603: internal JSON-RPC error.
    Internal,
    /// -32001: the requested task id was not found.
    TaskNotFound,
    /// -32002: the task is in a state where it cannot be canceled.
    TaskNotCancelable,
    /// -32003: the agent does not support push notifications.
    PushNotificationNotSupported,
    /// -32004: the requested operation is not supported.
    UnsupportedOperation,
    /// -32005: request and agent content types are incompatible.
    ContentTypeNotSupported,
    /// -32006: the agent returned a response that does not fit the method.
    InvalidAgentResponse,
}

impl ErrorCode {
    /// All codes, generic JSON-RPC codes first.
    pub const ALL: [ErrorCode; 11] = [
        ErrorCode::JsonParse,
        ErrorCode::InvalidRequest,
        ErrorCode::MethodNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::Internal,
        ErrorCode::TaskNotFound,
        ErrorCode::TaskNotCancelable,
        ErrorCode::PushNotificationNotSupported,
        ErrorCode::UnsupportedOperation,
        ErrorCode::ContentTypeNotSupported,
        ErrorCode::InvalidAgentResponse,
    ];

    /// The numeric JSON-RPC code.
    pub const fn code(self) -> i64 {
        match self {
            ErrorCode::JsonParse => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::Internal => -32603,
            ErrorCode::TaskNotFound => -32001,
            ErrorCode::TaskNotCancelable => -32002,
            ErrorCode::PushNotificationNotSupported => -32003,
            ErrorCode::UnsupportedOperation => -32004,
            ErrorCode::ContentTypeNotSupported => -32005,
            ErrorCode::InvalidAgentResponse => -32006,
        }
    }

    /// Look up a code by its numeric value.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// The message used when no override is supplied.
    pub const fn default_message(self) -> &'static str {
        match self {
            ErrorCode::JsonParse => "Invalid JSON payload",
            ErrorCode::InvalidRequest => "Request payload validation error",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid parameters",
            ErrorCode::Internal => "Internal error",
            ErrorCode::TaskNotFound => "Task not found",
            ErrorCode::TaskNotCancelable => "Task cannot be canceled",
            ErrorCode::PushNotificationNotSupported => "Push Notification is not supported",
            ErrorCode::UnsupportedOperation => "This operation is not supported",
            ErrorCode::ContentTypeNotSupported => "Incompatible content types",
            ErrorCode::InvalidAgentResponse => "Invalid agent response",
        }
    }

    /// Schema name of the error shape, e.g. `TaskNotFoundError`.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::JsonParse => "JSONParseError",
            ErrorCode::InvalidRequest => "InvalidRequestError",
            ErrorCode::MethodNotFound => "MethodNotFoundError",
            ErrorCode::InvalidParams => "InvalidParamsError",
            ErrorCode::Internal => "InternalError",
            ErrorCode::TaskNotFound => "TaskNotFoundError",
            ErrorCode::TaskNotCancelable => "TaskNotCancelableError",
            ErrorCode::PushNotificationNotSupported => "PushNotificationNotSupportedError",
            ErrorCode::UnsupportedOperation => "UnsupportedOperationError",
            ErrorCode::ContentTypeNotSupported => "ContentTypeNotSupportedError",
            ErrorCode::InvalidAgentResponse => "InvalidAgentResponseError",
        }
    }

    /// True for the A2A-specific codes (-32001..=-32006).
    pub const fn is_protocol_specific(self) -> bool {
        matches!(self.code(), -32006..=-32001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An A2A protocol error: one of the eleven codes, a non-empty message and
/// optional data.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("JSON-RPC error {code}: {message}")]
pub struct A2AError {
    code: ErrorCode,
    message: String,
    data: Option<Value>,
}

impl A2AError {
    /// Create an error carrying the code's default message.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            data: None,
        }
    }

    /// Override the message. An empty override keeps the default.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !message.is_empty() {
            self.message = message;
        }
        self
    }

    /// Attach contextual data.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    // ── Generic JSON-RPC errors ──────────────────────────────

    /// -32700 with the parser's diagnostic as data.
    pub fn parse_error(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::JsonParse).with_data(Value::String(detail.into()))
    }

    /// -32600 with a description of the envelope problem.
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest).with_data(Value::String(detail.into()))
    }

    /// -32601 naming the unknown method.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(ErrorCode::MethodNotFound)
            .with_data(Value::String(format!("Unknown method: {method}")))
    }

    /// -32602 with a description of the offending params.
    pub fn invalid_params(detail: impl Into<Value>) -> Self {
        Self::new(ErrorCode::InvalidParams).with_data(detail)
    }

    /// -32603 with a description of the fault.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal).with_data(Value::String(detail.into()))
    }

    // ── A2A-specific errors ──────────────────────────────────

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(ErrorCode::TaskNotFound)
            .with_data(Value::String(format!("Task {task_id} not found")))
    }

    pub fn task_not_cancelable(task_id: &str) -> Self {
        Self::new(ErrorCode::TaskNotCancelable).with_data(Value::String(format!(
            "Task {task_id} is in a terminal state"
        )))
    }

    pub fn push_notification_not_supported() -> Self {
        Self::new(ErrorCode::PushNotificationNotSupported)
    }

    pub fn unsupported_operation(operation: &str) -> Self {
        Self::new(ErrorCode::UnsupportedOperation)
            .with_data(Value::String(format!("Unsupported operation: {operation}")))
    }

    /// -32005 listing the content types that could not be matched.
    pub fn content_type_not_supported(requested: &[String]) -> Self {
        Self::new(ErrorCode::ContentTypeNotSupported).with_data(serde_json::json!({
            "requested": requested,
        }))
    }

    /// -32006 with a description of what the agent got wrong.
    pub fn invalid_agent_response(detail: impl Into<Value>) -> Self {
        Self::new(ErrorCode::InvalidAgentResponse).with_data(detail)
    }
}

impl From<A2AError> for JsonRpcError {
    fn from(err: A2AError) -> Self {
        JsonRpcError {
            code: err.code.code(),
            message: err.message,
            data: err.data,
        }
    }
}

/// Wire errors with a code outside the protocol table are handed back unchanged.
impl TryFrom<JsonRpcError> for A2AError {
    type Error = JsonRpcError;

    fn try_from(err: JsonRpcError) -> Result<Self, Self::Error> {
        match ErrorCode::from_code(err.code) {
            Some(code) => Ok(A2AError {
                data: err.data,
                ..A2AError::new(code).with_message(err.message)
            }),
            None => Err(err),
        }
    }
}

impl Serialize for A2AError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JsonRpcError::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for A2AError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonRpcError::deserialize(deserializer)?;
        A2AError::try_from(raw).map_err(|e| {
            serde::de::Error::custom(format!("unknown A2A error code {}", e.code))
        })
    }
}

/// A2A Result type alias.
pub type A2AResult<T> = Result<T, A2AError>;
