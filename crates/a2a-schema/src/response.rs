//! Typed A2A responses — each method bound to its success `result` shape.

use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::A2AError;
use crate::message::Message;
use crate::notification::TaskPushNotificationConfig;
use crate::request::Method;
use crate::task::Task;
use crate::transport::jsonrpc::{JsonRpcResponse, JsonRpcSuccessResponse, RequestId};
use crate::transport::stream::StreamResponse;

/// Result of `message/send`: a direct reply or the task it started.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum SendMessageResult {
    Message(Message),
    Task(Task),
}

impl SendMessageResult {
    pub fn kind(&self) -> &'static str {
        match self {
            SendMessageResult::Message(_) => "message",
            SendMessageResult::Task(_) => "task",
        }
    }
}

impl<'de> Deserialize<'de> for SendMessageResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = value.get("kind").and_then(Value::as_str).map(str::to_owned);
        match kind.as_deref() {
            Some("message") => serde_json::from_value(value)
                .map(SendMessageResult::Message)
                .map_err(de::Error::custom),
            Some("task") => serde_json::from_value(value)
                .map(SendMessageResult::Task)
                .map_err(de::Error::custom),
            Some(other) => Err(de::Error::unknown_variant(other, &["message", "task"])),
            None => Err(de::Error::missing_field("kind")),
        }
    }
}

impl From<Message> for SendMessageResult {
    fn from(message: Message) -> Self {
        SendMessageResult::Message(message)
    }
}

impl From<Task> for SendMessageResult {
    fn from(task: Task) -> Self {
        SendMessageResult::Task(task)
    }
}

pub type SendMessageResponse = JsonRpcResponse<SendMessageResult>;
pub type SendMessageSuccessResponse = JsonRpcSuccessResponse<SendMessageResult>;
pub type SendStreamingMessageResponse = JsonRpcResponse<StreamResponse>;
pub type SendStreamingMessageSuccessResponse = JsonRpcSuccessResponse<StreamResponse>;
pub type GetTaskResponse = JsonRpcResponse<Task>;
pub type GetTaskSuccessResponse = JsonRpcSuccessResponse<Task>;
pub type CancelTaskResponse = JsonRpcResponse<Task>;
pub type CancelTaskSuccessResponse = JsonRpcSuccessResponse<Task>;
pub type SetTaskPushNotificationConfigResponse = JsonRpcResponse<TaskPushNotificationConfig>;
pub type GetTaskPushNotificationConfigResponse = JsonRpcResponse<TaskPushNotificationConfig>;
pub type ListTaskPushNotificationConfigResponse =
    JsonRpcResponse<Vec<TaskPushNotificationConfig>>;
/// The success result of a delete is `null`.
pub type DeleteTaskPushNotificationConfigResponse = JsonRpcResponse<()>;

/// Any A2A response, one variant per method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum A2AResponse {
    SendMessage(SendMessageResponse),
    SendStreamingMessage(SendStreamingMessageResponse),
    GetTask(GetTaskResponse),
    CancelTask(CancelTaskResponse),
    SetTaskPushNotificationConfig(SetTaskPushNotificationConfigResponse),
    GetTaskPushNotificationConfig(GetTaskPushNotificationConfigResponse),
    ListTaskPushNotificationConfig(ListTaskPushNotificationConfigResponse),
    DeleteTaskPushNotificationConfig(DeleteTaskPushNotificationConfigResponse),
    ResubscribeTask(SendStreamingMessageResponse),
}

impl A2AResponse {
    /// Decode a response to a request for `method`.
    pub fn from_value(method: Method, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match method {
            Method::SendMessage => A2AResponse::SendMessage(serde_json::from_value(value)?),
            Method::SendStreamingMessage => {
                A2AResponse::SendStreamingMessage(serde_json::from_value(value)?)
            }
            Method::GetTask => A2AResponse::GetTask(serde_json::from_value(value)?),
            Method::CancelTask => A2AResponse::CancelTask(serde_json::from_value(value)?),
            Method::SetTaskPushNotificationConfig => {
                A2AResponse::SetTaskPushNotificationConfig(serde_json::from_value(value)?)
            }
            Method::GetTaskPushNotificationConfig => {
                A2AResponse::GetTaskPushNotificationConfig(serde_json::from_value(value)?)
            }
            Method::ListTaskPushNotificationConfig => {
                A2AResponse::ListTaskPushNotificationConfig(serde_json::from_value(value)?)
            }
            Method::DeleteTaskPushNotificationConfig => {
                A2AResponse::DeleteTaskPushNotificationConfig(serde_json::from_value(value)?)
            }
            Method::ResubscribeTask => A2AResponse::ResubscribeTask(serde_json::from_value(value)?),
        })
    }

    pub fn method(&self) -> Method {
        match self {
            A2AResponse::SendMessage(_) => Method::SendMessage,
            A2AResponse::SendStreamingMessage(_) => Method::SendStreamingMessage,
            A2AResponse::GetTask(_) => Method::GetTask,
            A2AResponse::CancelTask(_) => Method::CancelTask,
            A2AResponse::SetTaskPushNotificationConfig(_) => Method::SetTaskPushNotificationConfig,
            A2AResponse::GetTaskPushNotificationConfig(_) => Method::GetTaskPushNotificationConfig,
            A2AResponse::ListTaskPushNotificationConfig(_) => {
                Method::ListTaskPushNotificationConfig
            }
            A2AResponse::DeleteTaskPushNotificationConfig(_) => {
                Method::DeleteTaskPushNotificationConfig
            }
            A2AResponse::ResubscribeTask(_) => Method::ResubscribeTask,
        }
    }

    pub fn id(&self) -> Option<&RequestId> {
        match self {
            A2AResponse::SendMessage(r) => r.id(),
            A2AResponse::SendStreamingMessage(r) | A2AResponse::ResubscribeTask(r) => r.id(),
            A2AResponse::GetTask(r) | A2AResponse::CancelTask(r) => r.id(),
            A2AResponse::SetTaskPushNotificationConfig(r)
            | A2AResponse::GetTaskPushNotificationConfig(r) => r.id(),
            A2AResponse::ListTaskPushNotificationConfig(r) => r.id(),
            A2AResponse::DeleteTaskPushNotificationConfig(r) => r.id(),
        }
    }

    /// The error, when this is an error response.
    pub fn error(&self) -> Option<&A2AError> {
        match self {
            A2AResponse::SendMessage(r) => r.error_value(),
            A2AResponse::SendStreamingMessage(r) | A2AResponse::ResubscribeTask(r) => {
                r.error_value()
            }
            A2AResponse::GetTask(r) | A2AResponse::CancelTask(r) => r.error_value(),
            A2AResponse::SetTaskPushNotificationConfig(r)
            | A2AResponse::GetTaskPushNotificationConfig(r) => r.error_value(),
            A2AResponse::ListTaskPushNotificationConfig(r) => r.error_value(),
            A2AResponse::DeleteTaskPushNotificationConfig(r) => r.error_value(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }
}
