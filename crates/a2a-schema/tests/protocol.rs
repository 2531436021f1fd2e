//! End-to-end behaviour of the codec over whole JSON-RPC documents.

use std::collections::BTreeMap;
use std::fmt::Debug;

use a2a_schema::response::SendMessageSuccessResponse;
use a2a_schema::security::{
    AuthorizationCodeOAuthFlow, ClientCredentialsOAuthFlow, ImplicitOAuthFlow,
    OAuth2SecurityScheme, PasswordOAuthFlow,
};
use a2a_schema::{
    A2AError, A2ARequest, A2AResponse, Artifact, Codec, DeleteTaskPushNotificationConfigParams,
    ErrorCode, FileContent, GetTaskPushNotificationConfigParams, JsonRpcResponse,
    ListTaskPushNotificationConfigParams, Message, MessageSendConfiguration, MessageSendParams,
    Method, OAuthFlows, Part, PushNotificationAuthenticationInfo, PushNotificationConfig, Request,
    RequestId, Role, SecurityScheme, SendMessageResult, StreamResponse, Task,
    TaskArtifactUpdateEvent, TaskIdParams, TaskPushNotificationConfig, TaskQueryParams, TaskState,
    TaskStatusUpdateEvent, Validate, ValidationConfig,
};
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

fn hi_message() -> Message {
    serde_json::from_value(json!({
        "role": "user",
        "parts": [{"kind": "text", "text": "hi"}],
        "messageId": "m1",
        "kind": "message"
    }))
    .unwrap()
}

#[test]
fn send_message_round_trip_and_result_states() {
    let codec = Codec::default();
    let request = A2ARequest::SendMessage(Request::new("r1", MessageSendParams::new(hi_message())));

    let text = codec.encode(&request).unwrap();
    let decoded = codec.decode_request(&text).unwrap();
    assert_eq!(decoded, request);
    assert_eq!(decoded.method(), Method::SendMessage);
    assert_eq!(decoded.id(), &RequestId::from("r1"));

    let A2ARequest::SendMessage(send) = &decoded else {
        panic!("expected message/send");
    };
    assert_eq!(send.params.message.role, Role::User);
    assert_eq!(send.params.message.text_content(), "hi");

    let mut task = Task::new("ctx-1");
    task.id = "t1".into();
    let response: JsonRpcResponse<SendMessageResult> =
        JsonRpcResponse::success(RequestId::from("r1"), task.clone().into());
    let text = codec.encode(&response).unwrap();
    let decoded = codec.decode_response(Method::SendMessage, &text).unwrap();
    assert_eq!(decoded, A2AResponse::SendMessage(response));

    let mut raw: Value = serde_json::from_str(&text).unwrap();
    raw["result"]["status"]["state"] = json!("not-a-state");
    let err = codec
        .decode_response_value(Method::SendMessage, raw)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidAgentResponse);

    // the success envelope on its own
    let success: SendMessageSuccessResponse = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": "r1",
        "result": {"kind": "task", "id": "t1", "contextId": "ctx-1", "status": {"state": "submitted"}}
    }))
    .unwrap();
    let SendMessageResult::Task(task) = &success.result else {
        panic!("expected a task result");
    };
    assert_eq!(task.state(), TaskState::Submitted);
    assert!(success.result.validate(&ValidationConfig::default()).is_ok());
}

#[test]
fn file_part_requires_exactly_one_source() {
    let part = |file: Value| serde_json::from_value::<Part>(json!({"kind": "file", "file": file}));

    assert!(part(json!({"bytes": "aGVsbG8=", "uri": "https://example.com/a.txt"})).is_err());
    assert!(part(json!({"name": "a.txt"})).is_err());

    let Part::File(inline) = part(json!({"bytes": "aGVsbG8=", "mimeType": "text/plain"})).unwrap()
    else {
        panic!("expected a file part");
    };
    let FileContent::Bytes(bytes) = &inline.file else {
        panic!("expected inline bytes");
    };
    assert_eq!(bytes.decode().unwrap(), b"hello");

    let linked = part(json!({"uri": "https://example.com/a.txt"})).unwrap();
    let encoded = serde_json::to_value(&linked).unwrap();
    assert!(encoded["file"].get("bytes").is_none());
}

#[test]
fn response_with_both_result_and_error_is_rejected() {
    let codec = Codec::default();
    let both = r#"{"jsonrpc":"2.0","id":1,"result":{"kind":"task","id":"t1","contextId":"c1","status":{"state":"working"}},"error":{"code":-32603,"message":"Internal error"}}"#;
    let neither = r#"{"jsonrpc":"2.0","id":1}"#;
    for text in [both, neither] {
        let err = codec.decode_response(Method::GetTask, text).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidAgentResponse);
    }
}

#[test]
fn every_task_state_keeps_its_literal() {
    for literal in [
        "submitted",
        "working",
        "input-required",
        "completed",
        "canceled",
        "failed",
        "rejected",
        "auth-required",
        "unknown",
    ] {
        let state: TaskState = serde_json::from_value(json!(literal)).unwrap();
        assert_eq!(serde_json::to_value(state).unwrap(), json!(literal));
    }
}

#[test]
fn params_must_fit_the_method() {
    let codec = Codec::default();
    let request = json!({
        "jsonrpc": "2.0",
        "id": 9,
        "method": "tasks/get",
        "params": {"message": serde_json::to_value(hi_message()).unwrap()}
    });
    let rejection = codec.decode_request_value(request).unwrap_err();
    assert_eq!(rejection.error.code(), ErrorCode::InvalidParams);
    assert_eq!(rejection.id, Some(RequestId::Number(9)));
}

#[test]
fn push_config_get_accepts_legacy_params() {
    let codec = Codec::default();
    for params in [json!({"id": "t1"}), json!({"id": "t1", "pushNotificationConfigId": "cfg1"})] {
        let request = json!({
            "jsonrpc": "2.0",
            "id": "g1",
            "method": "tasks/pushNotificationConfig/get",
            "params": params
        });
        let decoded = codec.decode_request_value(request).unwrap();
        assert_eq!(decoded.method(), Method::GetTaskPushNotificationConfig);
    }
}

#[test]
fn task_not_found_error_is_exact() {
    let codec = Codec::default();
    let response = codec
        .decode_response(
            Method::GetTask,
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32001,"message":"Task not found"}}"#,
        )
        .unwrap();
    let err = response.error().unwrap();
    assert_eq!(err.code(), ErrorCode::TaskNotFound);
    assert_eq!(err.message(), "Task not found");
    assert_eq!(response.id(), Some(&RequestId::Number(1)));
}

#[test]
fn unknown_error_codes_are_not_protocol_errors() {
    let err = Codec::default()
        .decode_response(
            Method::GetTask,
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32099,"message":"Server busy"}}"#,
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidAgentResponse);
}

#[test]
fn streamed_responses_decode_in_order() {
    let codec = Codec::default();
    let mut task = Task::new("ctx-7");
    task.add_message(Message::user_text("summarize").in_task(task.id.clone(), "ctx-7"));

    let mut events: Vec<JsonRpcResponse<StreamResponse>> =
        vec![JsonRpcResponse::success(RequestId::Number(3), task.clone().into())];
    task.transition(TaskState::Working).unwrap();
    events.push(JsonRpcResponse::success(
        RequestId::Number(3),
        TaskStatusUpdateEvent::new(&task, false).into(),
    ));
    task.transition(TaskState::Completed).unwrap();
    events.push(JsonRpcResponse::success(
        RequestId::Number(3),
        TaskStatusUpdateEvent::new(&task, true).into(),
    ));

    let body: String = events
        .iter()
        .map(|e| format!("data: {}\n\n", serde_json::to_string(e).unwrap()))
        .collect();
    let decoded = codec.decode_stream(Method::SendStreamingMessage, &body).unwrap();
    assert_eq!(decoded, events);
    assert!(decoded.last().unwrap().result().unwrap().is_final());
}

fn webhook() -> PushNotificationConfig {
    PushNotificationConfig {
        id: Some("cfg1".into()),
        url: "https://client.example.com/hooks/a2a".into(),
        token: Some("opaque-token".into()),
        authentication: Some(PushNotificationAuthenticationInfo {
            schemes: vec!["Bearer".into()],
            credentials: None,
        }),
    }
}

fn assert_entity_round_trip<T>(codec: &Codec, entity: T)
where
    T: Serialize + DeserializeOwned + Validate + PartialEq + Debug,
{
    let text = codec.encode(&entity).unwrap();
    let decoded: T = codec.decode(serde_json::from_str(&text).unwrap()).unwrap();
    assert_eq!(decoded, entity);
}

#[test]
fn every_request_method_round_trips() {
    let codec = Codec::default();
    let mut configured = MessageSendParams::new(hi_message());
    configured.configuration = Some(MessageSendConfiguration {
        accepted_output_modes: vec!["text/plain".into()],
        history_length: Some(5),
        push_notification_config: Some(webhook()),
        blocking: Some(false),
    });

    let requests = vec![
        A2ARequest::SendMessage(Request::new(1_i64, configured.clone())),
        A2ARequest::SendStreamingMessage(Request::new("s1", configured)),
        A2ARequest::GetTask(Request::new(
            2_i64,
            TaskQueryParams {
                id: "t1".into(),
                history_length: Some(10),
                metadata: None,
            },
        )),
        A2ARequest::CancelTask(Request::new(3_i64, TaskIdParams::new("t1"))),
        A2ARequest::SetTaskPushNotificationConfig(Request::new(
            4_i64,
            TaskPushNotificationConfig {
                task_id: "t1".into(),
                push_notification_config: webhook(),
            },
        )),
        A2ARequest::GetTaskPushNotificationConfig(Request::new(
            5_i64,
            GetTaskPushNotificationConfigParams {
                id: "t1".into(),
                push_notification_config_id: Some("cfg1".into()),
                metadata: None,
            },
        )),
        A2ARequest::ListTaskPushNotificationConfig(Request::new(
            6_i64,
            ListTaskPushNotificationConfigParams {
                id: "t1".into(),
                metadata: None,
            },
        )),
        A2ARequest::DeleteTaskPushNotificationConfig(Request::new(
            7_i64,
            DeleteTaskPushNotificationConfigParams {
                id: "t1".into(),
                push_notification_config_id: "cfg1".into(),
                metadata: None,
            },
        )),
        A2ARequest::ResubscribeTask(Request::new("r8", TaskIdParams::new("t1"))),
    ];

    let methods: Vec<Method> = requests.iter().map(A2ARequest::method).collect();
    assert_eq!(methods, Method::ALL.to_vec());

    for request in requests {
        let text = codec.encode(&request).unwrap();
        assert_eq!(codec.decode_request(&text).unwrap(), request);
    }
}

#[test]
fn entities_round_trip() {
    let codec = Codec::default();
    let scopes = BTreeMap::from([("read".to_string(), "Read access".to_string())]);

    let task = Task::new("ctx-1");
    let mut chunk = TaskArtifactUpdateEvent::new(&task, Artifact::text("summary", "All good."));
    chunk.append = Some(true);
    chunk.last_chunk = Some(false);
    assert_entity_round_trip(&codec, chunk);

    assert_entity_round_trip(
        &codec,
        SecurityScheme::OAuth2(OAuth2SecurityScheme {
            flows: OAuthFlows {
                authorization_code: Some(AuthorizationCodeOAuthFlow {
                    authorization_url: "https://auth.example.com/authorize".into(),
                    token_url: "https://auth.example.com/token".into(),
                    refresh_url: Some("https://auth.example.com/refresh".into()),
                    scopes: scopes.clone(),
                }),
                client_credentials: Some(ClientCredentialsOAuthFlow {
                    token_url: "https://auth.example.com/token".into(),
                    refresh_url: None,
                    scopes: scopes.clone(),
                }),
                implicit: Some(ImplicitOAuthFlow {
                    authorization_url: "https://auth.example.com/authorize".into(),
                    refresh_url: None,
                    scopes: scopes.clone(),
                }),
                password: Some(PasswordOAuthFlow {
                    token_url: "https://auth.example.com/token".into(),
                    refresh_url: None,
                    scopes,
                }),
            },
            oauth2_metadata_url: Some(
                "https://auth.example.com/.well-known/oauth-authorization-server".into(),
            ),
            description: Some("Corporate SSO".into()),
        }),
    );

    assert_entity_round_trip(
        &codec,
        MessageSendConfiguration {
            accepted_output_modes: vec!["application/json".into()],
            history_length: None,
            push_notification_config: Some(webhook()),
            blocking: Some(true),
        },
    );

    let failed: JsonRpcResponse<Task> = JsonRpcResponse::error(
        Some(RequestId::Number(12)),
        A2AError::task_not_cancelable("t1").with_data(json!({"state": "completed"})),
    );
    assert_entity_round_trip(&codec, failed);
}

#[test]
fn success_without_request_id_is_rejected() {
    let codec = Codec::default();
    let task = json!({"kind": "task", "id": "t1", "contextId": "c1", "status": {"state": "working"}});
    for response in [
        json!({"jsonrpc": "2.0", "result": task.clone()}),
        json!({"jsonrpc": "2.0", "id": null, "result": task}),
    ] {
        let err = codec.decode_response_value(Method::GetTask, response).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidAgentResponse);
    }
}

#[test]
fn task_timestamps_without_offset_are_accepted() {
    let codec = Codec::default();
    let response = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "kind": "task",
            "id": "t1",
            "contextId": "c1",
            "status": {"state": "working", "timestamp": "2023-10-27T10:00:00"}
        }
    });
    let decoded = codec.decode_response_value(Method::GetTask, response.clone()).unwrap();
    assert_eq!(codec.encode_value(&decoded).unwrap(), response);

    let mut garbled = response;
    garbled["result"]["status"]["timestamp"] = json!("last tuesday");
    let err = codec.decode_response_value(Method::GetTask, garbled).unwrap_err();
    assert_eq!(err.data().unwrap()["path"], "result.status.timestamp");
}
