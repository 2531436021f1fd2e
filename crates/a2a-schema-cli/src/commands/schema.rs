//! `a2a-schema schema` — print the JSON Schema of a protocol entity.

use a2a_schema::transport::jsonrpc::JsonRpcRequest;
use a2a_schema::{
    A2AError, AgentCard, Artifact, Message, MessageSendParams, Part, PushNotificationConfig,
    SecurityScheme, SendMessageResult, StreamResponse, Task, TaskPushNotificationConfig,
};
use clap::{Args, ValueEnum};
use schemars::schema_for;

use super::print_json;

#[derive(Args)]
pub struct SchemaArgs {
    /// Entity to describe.
    pub target: SchemaTarget,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaTarget {
    AgentCard,
    Task,
    Message,
    Part,
    Artifact,
    SecurityScheme,
    PushNotificationConfig,
    TaskPushNotificationConfig,
    MessageSendParams,
    SendMessageResult,
    StreamResponse,
    Request,
    Error,
}

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let schema = match args.target {
        SchemaTarget::AgentCard => schema_for!(AgentCard),
        SchemaTarget::Task => schema_for!(Task),
        SchemaTarget::Message => schema_for!(Message),
        SchemaTarget::Part => schema_for!(Part),
        SchemaTarget::Artifact => schema_for!(Artifact),
        SchemaTarget::SecurityScheme => schema_for!(SecurityScheme),
        SchemaTarget::PushNotificationConfig => schema_for!(PushNotificationConfig),
        SchemaTarget::TaskPushNotificationConfig => schema_for!(TaskPushNotificationConfig),
        SchemaTarget::MessageSendParams => schema_for!(MessageSendParams),
        SchemaTarget::SendMessageResult => schema_for!(SendMessageResult),
        SchemaTarget::StreamResponse => schema_for!(StreamResponse),
        SchemaTarget::Request => schema_for!(JsonRpcRequest),
        SchemaTarget::Error => schema_for!(A2AError),
    };
    print_json(&schema)
}
