//! Typed A2A requests — each JSON-RPC method bound to its params shape.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::de::{self, DeserializeOwned};
use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::A2AError;
use crate::kinds::Metadata;
use crate::message::Message;
use crate::notification::{
    DeleteTaskPushNotificationConfigParams, GetTaskPushNotificationConfigParams,
    ListTaskPushNotificationConfigParams, PushNotificationConfig, TaskPushNotificationConfig,
};
use crate::task::{TaskIdParams, TaskQueryParams};
use crate::transport::jsonrpc::{methods, JsonRpcRequest, RequestId};
use crate::validate::Violation;

/// Parameters for `message/send` and `message/stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendParams {
    /// The message being sent.
    pub message: Message,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<MessageSendConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl MessageSendParams {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            configuration: None,
            metadata: None,
        }
    }
}

/// Options for a send-message call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendConfiguration {
    /// Output MIME types the client accepts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_output_modes: Vec<String>,

    /// Number of recent history messages to include in the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<u32>,

    /// Where the agent should send updates once the client disconnects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_notification_config: Option<PushNotificationConfig>,

    /// Wait for the task to reach a terminal or interrupted state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking: Option<bool>,
}

/// The nine A2A JSON-RPC methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Method {
    #[serde(rename = "message/send")]
    SendMessage,
    #[serde(rename = "message/stream")]
    SendStreamingMessage,
    #[serde(rename = "tasks/get")]
    GetTask,
    #[serde(rename = "tasks/cancel")]
    CancelTask,
    #[serde(rename = "tasks/pushNotificationConfig/set")]
    SetTaskPushNotificationConfig,
    #[serde(rename = "tasks/pushNotificationConfig/get")]
    GetTaskPushNotificationConfig,
    #[serde(rename = "tasks/pushNotificationConfig/list")]
    ListTaskPushNotificationConfig,
    #[serde(rename = "tasks/pushNotificationConfig/delete")]
    DeleteTaskPushNotificationConfig,
    #[serde(rename = "tasks/resubscribe")]
    ResubscribeTask,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::SendMessage,
        Method::SendStreamingMessage,
        Method::GetTask,
        Method::CancelTask,
        Method::SetTaskPushNotificationConfig,
        Method::GetTaskPushNotificationConfig,
        Method::ListTaskPushNotificationConfig,
        Method::DeleteTaskPushNotificationConfig,
        Method::ResubscribeTask,
    ];

    /// The wire method name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::SendMessage => methods::SEND_MESSAGE,
            Method::SendStreamingMessage => methods::SEND_STREAMING_MESSAGE,
            Method::GetTask => methods::GET_TASK,
            Method::CancelTask => methods::CANCEL_TASK,
            Method::SetTaskPushNotificationConfig => methods::SET_TASK_PUSH_NOTIFICATION_CONFIG,
            Method::GetTaskPushNotificationConfig => methods::GET_TASK_PUSH_NOTIFICATION_CONFIG,
            Method::ListTaskPushNotificationConfig => methods::LIST_TASK_PUSH_NOTIFICATION_CONFIG,
            Method::DeleteTaskPushNotificationConfig => {
                methods::DELETE_TASK_PUSH_NOTIFICATION_CONFIG
            }
            Method::ResubscribeTask => methods::RESUBSCRIBE_TASK,
        }
    }

    /// Methods answered by a stream of responses rather than one.
    pub const fn is_streaming(self) -> bool {
        matches!(self, Method::SendStreamingMessage | Method::ResubscribeTask)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = A2AError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| A2AError::method_not_found(s))
    }
}

/// A request id paired with typed params. The method is fixed by the
/// [`A2ARequest`] variant holding it.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<P> {
    pub id: RequestId,
    pub params: P,
}

impl<P> Request<P> {
    pub fn new(id: impl Into<RequestId>, params: P) -> Self {
        Self {
            id: id.into(),
            params,
        }
    }
}

impl<P: Serialize> Request<P> {
    fn envelope(&self, method: Method) -> Result<JsonRpcRequest, serde_json::Error> {
        Ok(JsonRpcRequest::new(
            self.id.clone(),
            method.as_str(),
            Some(serde_json::to_value(&self.params)?),
        ))
    }
}

impl<P: DeserializeOwned> Request<P> {
    fn from_params(id: RequestId, params: Value) -> Result<Self, A2AError> {
        serde_json::from_value(params)
            .map(|params| Request { id, params })
            .map_err(|e| A2AError::invalid_params(Violation::new("params", e.to_string())))
    }
}

pub type SendMessageRequest = Request<MessageSendParams>;
pub type SendStreamingMessageRequest = Request<MessageSendParams>;
pub type GetTaskRequest = Request<TaskQueryParams>;
pub type CancelTaskRequest = Request<TaskIdParams>;
pub type SetTaskPushNotificationConfigRequest = Request<TaskPushNotificationConfig>;
pub type GetTaskPushNotificationConfigRequest = Request<GetTaskPushNotificationConfigParams>;
pub type ListTaskPushNotificationConfigRequest = Request<ListTaskPushNotificationConfigParams>;
pub type DeleteTaskPushNotificationConfigRequest = Request<DeleteTaskPushNotificationConfigParams>;
pub type TaskResubscriptionRequest = Request<TaskIdParams>;

/// Any A2A request, one variant per method.
#[derive(Debug, Clone, PartialEq)]
pub enum A2ARequest {
    SendMessage(SendMessageRequest),
    SendStreamingMessage(SendStreamingMessageRequest),
    GetTask(GetTaskRequest),
    CancelTask(CancelTaskRequest),
    SetTaskPushNotificationConfig(SetTaskPushNotificationConfigRequest),
    GetTaskPushNotificationConfig(GetTaskPushNotificationConfigRequest),
    ListTaskPushNotificationConfig(ListTaskPushNotificationConfigRequest),
    DeleteTaskPushNotificationConfig(DeleteTaskPushNotificationConfigRequest),
    ResubscribeTask(TaskResubscriptionRequest),
}

impl A2ARequest {
    pub fn method(&self) -> Method {
        match self {
            A2ARequest::SendMessage(_) => Method::SendMessage,
            A2ARequest::SendStreamingMessage(_) => Method::SendStreamingMessage,
            A2ARequest::GetTask(_) => Method::GetTask,
            A2ARequest::CancelTask(_) => Method::CancelTask,
            A2ARequest::SetTaskPushNotificationConfig(_) => Method::SetTaskPushNotificationConfig,
            A2ARequest::GetTaskPushNotificationConfig(_) => Method::GetTaskPushNotificationConfig,
            A2ARequest::ListTaskPushNotificationConfig(_) => {
                Method::ListTaskPushNotificationConfig
            }
            A2ARequest::DeleteTaskPushNotificationConfig(_) => {
                Method::DeleteTaskPushNotificationConfig
            }
            A2ARequest::ResubscribeTask(_) => Method::ResubscribeTask,
        }
    }

    pub fn id(&self) -> &RequestId {
        match self {
            A2ARequest::SendMessage(r) | A2ARequest::SendStreamingMessage(r) => &r.id,
            A2ARequest::GetTask(r) => &r.id,
            A2ARequest::CancelTask(r) | A2ARequest::ResubscribeTask(r) => &r.id,
            A2ARequest::SetTaskPushNotificationConfig(r) => &r.id,
            A2ARequest::GetTaskPushNotificationConfig(r) => &r.id,
            A2ARequest::ListTaskPushNotificationConfig(r) => &r.id,
            A2ARequest::DeleteTaskPushNotificationConfig(r) => &r.id,
        }
    }

    /// The untyped envelope for this request.
    pub fn to_envelope(&self) -> Result<JsonRpcRequest, serde_json::Error> {
        let method = self.method();
        match self {
            A2ARequest::SendMessage(r) | A2ARequest::SendStreamingMessage(r) => r.envelope(method),
            A2ARequest::GetTask(r) => r.envelope(method),
            A2ARequest::CancelTask(r) | A2ARequest::ResubscribeTask(r) => r.envelope(method),
            A2ARequest::SetTaskPushNotificationConfig(r) => r.envelope(method),
            A2ARequest::GetTaskPushNotificationConfig(r) => r.envelope(method),
            A2ARequest::ListTaskPushNotificationConfig(r) => r.envelope(method),
            A2ARequest::DeleteTaskPushNotificationConfig(r) => r.envelope(method),
        }
    }
}

/// Binds an envelope to its method's params shape.
///
/// A wrong `jsonrpc` version is an invalid request, an unknown method is
/// method-not-found and params of the wrong shape are invalid params.
impl TryFrom<JsonRpcRequest> for A2ARequest {
    type Error = A2AError;

    fn try_from(raw: JsonRpcRequest) -> Result<Self, Self::Error> {
        if !raw.is_v2() {
            return Err(A2AError::invalid_request(format!(
                "unsupported jsonrpc version `{}`",
                raw.jsonrpc
            )));
        }
        let method: Method = raw.method.parse()?;
        let id = raw.id;
        let params = raw.params.unwrap_or(Value::Null);

        Ok(match method {
            Method::SendMessage => A2ARequest::SendMessage(Request::from_params(id, params)?),
            Method::SendStreamingMessage => {
                A2ARequest::SendStreamingMessage(Request::from_params(id, params)?)
            }
            Method::GetTask => A2ARequest::GetTask(Request::from_params(id, params)?),
            Method::CancelTask => A2ARequest::CancelTask(Request::from_params(id, params)?),
            Method::SetTaskPushNotificationConfig => {
                A2ARequest::SetTaskPushNotificationConfig(Request::from_params(id, params)?)
            }
            Method::GetTaskPushNotificationConfig => {
                A2ARequest::GetTaskPushNotificationConfig(Request::from_params(id, params)?)
            }
            Method::ListTaskPushNotificationConfig => {
                A2ARequest::ListTaskPushNotificationConfig(Request::from_params(id, params)?)
            }
            Method::DeleteTaskPushNotificationConfig => {
                A2ARequest::DeleteTaskPushNotificationConfig(Request::from_params(id, params)?)
            }
            Method::ResubscribeTask => {
                A2ARequest::ResubscribeTask(Request::from_params(id, params)?)
            }
        })
    }
}

impl Serialize for A2ARequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_envelope()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for A2ARequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonRpcRequest::deserialize(deserializer)?;
        A2ARequest::try_from(raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_method_names() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
            assert_eq!(
                serde_json::to_value(method).unwrap(),
                json!(method.as_str())
            );
        }
        let err = "tasks/list".parse::<Method>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::MethodNotFound);
        assert!(Method::ResubscribeTask.is_streaming());
        assert!(!Method::GetTask.is_streaming());
    }

    #[test]
    fn test_send_message_envelope() {
        let mut message = Message::user_text("hi");
        message.message_id = "m1".into();
        let request = A2ARequest::SendMessage(Request::new("r1", MessageSendParams::new(message)));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "message/send");
        assert_eq!(json["id"], "r1");
        assert_eq!(json["params"]["message"]["messageId"], "m1");

        let parsed: A2ARequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_params_bound_to_method() {
        let raw = JsonRpcRequest::new(
            RequestId::Number(3),
            methods::GET_TASK,
            Some(json!({"message": {"role": "user", "parts": [], "messageId": "m1", "kind": "message"}})),
        );
        let err = A2ARequest::try_from(raw).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParams);
        assert_eq!(err.data().unwrap()["path"], "params");
    }

    #[test]
    fn test_missing_params_is_invalid_params() {
        let raw = JsonRpcRequest::new(RequestId::Number(1), methods::CANCEL_TASK, None);
        let err = A2ARequest::try_from(raw).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn test_wrong_version_is_invalid_request() {
        let mut raw = JsonRpcRequest::new(
            RequestId::Number(1),
            methods::CANCEL_TASK,
            Some(json!({"id": "t1"})),
        );
        raw.jsonrpc = "1.0".into();
        let err = A2ARequest::try_from(raw).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
