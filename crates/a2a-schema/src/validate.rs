//! Cross-field validation rules.
//!
//! Serde decoding settles shape: required fields, discriminants, the
//! bytes/uri and result/error exclusions. [`Validate`] covers what a type
//! cannot express, such as non-empty identifiers, absolute URLs, unique skill
//! ids and security requirements that name declared schemes.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::agent_card::{AgentCard, AgentSkill, SecurityRequirement};
use crate::artifact::Artifact;
use crate::config::ValidationConfig;
use crate::message::{FileContent, Message, Part};
use crate::notification::{
    DeleteTaskPushNotificationConfigParams, GetTaskPushNotificationConfigParams,
    ListTaskPushNotificationConfigParams, PushNotificationConfig, TaskPushNotificationConfig,
};
use crate::request::{A2ARequest, MessageSendConfiguration, MessageSendParams};
use crate::response::{A2AResponse, SendMessageResult};
use crate::security::SecurityScheme;
use crate::task::{
    Task, TaskArtifactUpdateEvent, TaskIdParams, TaskQueryParams, TaskStatus,
    TaskStatusUpdateEvent,
};
use crate::transport::jsonrpc::JsonRpcResponse;
use crate::transport::stream::StreamResponse;

/// A rule broken by a decoded value, located by a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct Violation {
    pub path: String,
    pub reason: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the path with the field that contains it.
    pub fn within(mut self, prefix: &str) -> Self {
        self.path = if self.path.is_empty() {
            prefix.to_string()
        } else if self.path.starts_with('[') {
            format!("{prefix}{}", self.path)
        } else {
            format!("{prefix}.{}", self.path)
        };
        self
    }
}

impl From<Violation> for Value {
    fn from(violation: Violation) -> Self {
        json!({ "path": violation.path, "reason": violation.reason })
    }
}

/// Rules a decoded value must satisfy beyond its JSON shape.
pub trait Validate {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        for (i, item) in self.iter().enumerate() {
            item.validate(config).map_err(|v| v.within(&format!("[{i}]")))?;
        }
        Ok(())
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        match self {
            Some(inner) => inner.validate(config),
            None => Ok(()),
        }
    }
}

impl Validate for () {
    fn validate(&self, _: &ValidationConfig) -> Result<(), Violation> {
        Ok(())
    }
}

fn non_empty(path: &str, value: &str) -> Result<(), Violation> {
    if value.trim().is_empty() {
        return Err(Violation::new(path, "must not be empty"));
    }
    Ok(())
}

fn absolute_url(config: &ValidationConfig, path: &str, value: &str) -> Result<(), Violation> {
    if !config.verify_urls {
        return Ok(());
    }
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| Violation::new(path, format!("`{value}` is not an absolute URL ({e})")))
}

fn nested<T: Validate + ?Sized>(
    value: &T,
    config: &ValidationConfig,
    field: &str,
) -> Result<(), Violation> {
    value.validate(config).map_err(|v| v.within(field))
}

// ── Messages and parts ───────────────────────────────────────

impl Validate for Message {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        non_empty("messageId", &self.message_id)?;
        if let Some(task_id) = &self.task_id {
            non_empty("taskId", task_id)?;
        }
        if let Some(context_id) = &self.context_id {
            non_empty("contextId", context_id)?;
        }
        nested(&self.parts, config, "parts")
    }
}

impl Validate for Part {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        match self {
            Part::Text(_) | Part::Data(_) => Ok(()),
            Part::File(part) => nested(&part.file, config, "file"),
        }
    }
}

impl Validate for FileContent {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        match self {
            FileContent::Bytes(file) => {
                if config.verify_file_bytes {
                    STANDARD
                        .decode(&file.bytes)
                        .map_err(|e| Violation::new("bytes", format!("invalid base64: {e}")))?;
                }
                Ok(())
            }
            FileContent::Uri(file) => absolute_url(config, "uri", &file.uri),
        }
    }
}

impl Validate for Artifact {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        non_empty("artifactId", &self.artifact_id)?;
        nested(&self.parts, config, "parts")
    }
}

// ── Tasks ────────────────────────────────────────────────────

impl Validate for TaskStatus {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        if let Some(raw) = &self.timestamp {
            if self.timestamp_utc().is_none() {
                return Err(Violation::new(
                    "timestamp",
                    format!("`{raw}` is not an ISO 8601 date-time"),
                ));
            }
        }
        nested(&self.message, config, "message")
    }
}

impl Validate for Task {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        non_empty("id", &self.id)?;
        non_empty("contextId", &self.context_id)?;
        nested(&self.status, config, "status")?;

        for (i, message) in self.history.iter().enumerate() {
            let path = format!("history[{i}]");
            nested(message, config, &path)?;
            if let Some(task_id) = &message.task_id {
                if *task_id != self.id {
                    return Err(Violation::new(
                        format!("{path}.taskId"),
                        format!("references task `{task_id}`, not `{}`", self.id),
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        for (i, artifact) in self.artifacts.iter().enumerate() {
            let path = format!("artifacts[{i}]");
            nested(artifact, config, &path)?;
            if !seen.insert(artifact.artifact_id.as_str()) {
                return Err(Violation::new(
                    format!("{path}.artifactId"),
                    format!("duplicate artifact id `{}`", artifact.artifact_id),
                ));
            }
        }
        Ok(())
    }
}

impl Validate for TaskStatusUpdateEvent {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        non_empty("taskId", &self.task_id)?;
        non_empty("contextId", &self.context_id)?;
        nested(&self.status, config, "status")
    }
}

impl Validate for TaskArtifactUpdateEvent {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        non_empty("taskId", &self.task_id)?;
        non_empty("contextId", &self.context_id)?;
        nested(&self.artifact, config, "artifact")
    }
}

impl Validate for TaskIdParams {
    fn validate(&self, _: &ValidationConfig) -> Result<(), Violation> {
        non_empty("id", &self.id)
    }
}

impl Validate for TaskQueryParams {
    fn validate(&self, _: &ValidationConfig) -> Result<(), Violation> {
        non_empty("id", &self.id)
    }
}

// ── Push notifications ───────────────────────────────────────

impl Validate for PushNotificationConfig {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        absolute_url(config, "url", &self.url)?;
        if let Some(auth) = &self.authentication {
            if auth.schemes.is_empty() {
                return Err(Violation::new(
                    "authentication.schemes",
                    "must list at least one scheme",
                ));
            }
        }
        Ok(())
    }
}

impl Validate for TaskPushNotificationConfig {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        non_empty("taskId", &self.task_id)?;
        nested(&self.push_notification_config, config, "pushNotificationConfig")
    }
}

impl Validate for GetTaskPushNotificationConfigParams {
    fn validate(&self, _: &ValidationConfig) -> Result<(), Violation> {
        non_empty("id", &self.id)?;
        if let Some(config_id) = &self.push_notification_config_id {
            non_empty("pushNotificationConfigId", config_id)?;
        }
        Ok(())
    }
}

impl Validate for ListTaskPushNotificationConfigParams {
    fn validate(&self, _: &ValidationConfig) -> Result<(), Violation> {
        non_empty("id", &self.id)
    }
}

impl Validate for DeleteTaskPushNotificationConfigParams {
    fn validate(&self, _: &ValidationConfig) -> Result<(), Violation> {
        non_empty("id", &self.id)?;
        non_empty("pushNotificationConfigId", &self.push_notification_config_id)
    }
}

// ── Requests and responses ───────────────────────────────────

impl Validate for MessageSendConfiguration {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        nested(&self.push_notification_config, config, "pushNotificationConfig")
    }
}

impl Validate for MessageSendParams {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        nested(&self.message, config, "message")?;
        nested(&self.configuration, config, "configuration")
    }
}

impl Validate for A2ARequest {
    /// Paths are rooted at `params`.
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        let checked = match self {
            A2ARequest::SendMessage(r) | A2ARequest::SendStreamingMessage(r) => {
                r.params.validate(config)
            }
            A2ARequest::GetTask(r) => r.params.validate(config),
            A2ARequest::CancelTask(r) | A2ARequest::ResubscribeTask(r) => r.params.validate(config),
            A2ARequest::SetTaskPushNotificationConfig(r) => r.params.validate(config),
            A2ARequest::GetTaskPushNotificationConfig(r) => r.params.validate(config),
            A2ARequest::ListTaskPushNotificationConfig(r) => r.params.validate(config),
            A2ARequest::DeleteTaskPushNotificationConfig(r) => r.params.validate(config),
        };
        checked.map_err(|v| v.within("params"))
    }
}

impl Validate for SendMessageResult {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        match self {
            SendMessageResult::Message(message) => message.validate(config),
            SendMessageResult::Task(task) => task.validate(config),
        }
    }
}

impl Validate for StreamResponse {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        match self {
            StreamResponse::Message(message) => message.validate(config),
            StreamResponse::Task(task) => task.validate(config),
            StreamResponse::StatusUpdate(event) => event.validate(config),
            StreamResponse::ArtifactUpdate(event) => event.validate(config),
        }
    }
}

impl<T: Validate> Validate for JsonRpcResponse<T> {
    /// Error responses carry nothing to check; paths of a result are rooted at `result`.
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        match self.result() {
            Some(result) => nested(result, config, "result"),
            None => Ok(()),
        }
    }
}

impl Validate for A2AResponse {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        match self {
            A2AResponse::SendMessage(r) => r.validate(config),
            A2AResponse::SendStreamingMessage(r) | A2AResponse::ResubscribeTask(r) => {
                r.validate(config)
            }
            A2AResponse::GetTask(r) | A2AResponse::CancelTask(r) => r.validate(config),
            A2AResponse::SetTaskPushNotificationConfig(r)
            | A2AResponse::GetTaskPushNotificationConfig(r) => r.validate(config),
            A2AResponse::ListTaskPushNotificationConfig(r) => r.validate(config),
            A2AResponse::DeleteTaskPushNotificationConfig(r) => r.validate(config),
        }
    }
}

// ── Agent card ───────────────────────────────────────────────

impl Validate for SecurityScheme {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        match self {
            SecurityScheme::ApiKey(scheme) => non_empty("name", &scheme.name),
            SecurityScheme::Http(scheme) => non_empty("scheme", &scheme.scheme),
            SecurityScheme::OAuth2(scheme) => {
                if scheme.flows.is_empty() {
                    return Err(Violation::new("flows", "must declare at least one flow"));
                }
                for (path, url) in scheme.flows.urls() {
                    absolute_url(config, &format!("flows.{path}"), url)?;
                }
                if let Some(url) = &scheme.oauth2_metadata_url {
                    absolute_url(config, "oauth2MetadataUrl", url)?;
                }
                Ok(())
            }
            SecurityScheme::OpenIdConnect(scheme) => {
                absolute_url(config, "openIdConnectUrl", &scheme.open_id_connect_url)
            }
        }
    }
}

impl Validate for AgentSkill {
    fn validate(&self, _: &ValidationConfig) -> Result<(), Violation> {
        non_empty("id", &self.id)?;
        non_empty("name", &self.name)
    }
}

fn declared_schemes(
    card: &AgentCard,
    requirements: &[SecurityRequirement],
    path: &str,
) -> Result<(), Violation> {
    for (i, requirement) in requirements.iter().enumerate() {
        if let Some(name) = requirement
            .keys()
            .find(|name| !card.security_schemes.contains_key(*name))
        {
            return Err(Violation::new(
                format!("{path}[{i}]"),
                format!("references undeclared security scheme `{name}`"),
            ));
        }
    }
    Ok(())
}

impl Validate for AgentCard {
    fn validate(&self, config: &ValidationConfig) -> Result<(), Violation> {
        non_empty("name", &self.name)?;
        non_empty("protocolVersion", &self.protocol_version)?;
        absolute_url(config, "url", &self.url)?;

        for (i, interface) in self.additional_interfaces.iter().enumerate() {
            absolute_url(config, &format!("additionalInterfaces[{i}].url"), &interface.url)?;
        }
        let transport = self.effective_transport();
        if !self.additional_interfaces.is_empty()
            && !self
                .additional_interfaces
                .iter()
                .any(|i| i.url == self.url && i.transport == transport)
        {
            if config.require_preferred_interface {
                return Err(Violation::new(
                    "additionalInterfaces",
                    format!("must include the preferred interface ({}, {transport})", self.url),
                ));
            }
            warn!(
                card = %self.name,
                url = %self.url,
                %transport,
                "additionalInterfaces does not list the preferred interface"
            );
        }

        if let Some(provider) = &self.provider {
            absolute_url(config, "provider.url", &provider.url)?;
        }
        if let Some(url) = &self.documentation_url {
            absolute_url(config, "documentationUrl", url)?;
        }
        if let Some(url) = &self.icon_url {
            absolute_url(config, "iconUrl", url)?;
        }

        for (name, scheme) in &self.security_schemes {
            nested(scheme, config, &format!("securitySchemes.{name}"))?;
        }
        declared_schemes(self, &self.security, "security")?;

        let mut seen = HashSet::new();
        for (i, skill) in self.skills.iter().enumerate() {
            let path = format!("skills[{i}]");
            nested(skill, config, &path)?;
            if !seen.insert(skill.id.as_str()) {
                return Err(Violation::new(
                    format!("{path}.id"),
                    format!("duplicate skill id `{}`", skill.id),
                ));
            }
            declared_schemes(self, &skill.security, &format!("{path}.security"))?;
        }

        for (i, signature) in self.signatures.iter().enumerate() {
            non_empty(&format!("signatures[{i}].protected"), &signature.protected)?;
            non_empty(&format!("signatures[{i}].signature"), &signature.signature)?;
        }
        Ok(())
    }
}
