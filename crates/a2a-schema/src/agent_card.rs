//! Agent Card — the self-describing metadata document for agent discovery.
//!
//! Every A2A-compatible agent publishes an Agent Card (conventionally at
//! `/.well-known/agent-card.json`). The card describes the agent's endpoint
//! and transports, capabilities, skills, security schemes and default
//! input/output modes, and may be signed with detached JWS signatures.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::kinds::Metadata;
use crate::security::SecurityScheme;

/// Protocol version written by this crate.
pub const PROTOCOL_VERSION: &str = "0.3.0";

fn default_protocol_version() -> String {
    PROTOCOL_VERSION.to_string()
}

/// Scheme name → required scopes. One entry of a card's `security` list.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// An A2A Agent Card — metadata describing an agent's capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// A2A protocol version this card targets.
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,

    /// Human-readable name of the agent.
    pub name: String,

    /// Description of what the agent does.
    pub description: String,

    /// Preferred endpoint URL.
    pub url: String,

    /// Transport reachable at `url`. Absent means JSON-RPC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_transport: Option<TransportProtocol>,

    /// Further (url, transport) pairs the agent serves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_interfaces: Vec<AgentInterface>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    /// The provider/organization that created this agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<AgentProvider>,

    /// Version of the agent, format chosen by the provider.
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,

    /// Capabilities declared by this agent.
    pub capabilities: AgentCapabilities,

    /// Security schemes, by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,

    /// Security requirements (references into `security_schemes`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,

    /// Default input MIME types accepted.
    pub default_input_modes: Vec<String>,

    /// Default output MIME types produced.
    pub default_output_modes: Vec<String>,

    /// Skills (specific abilities) of this agent.
    pub skills: Vec<AgentSkill>,

    /// Whether an extended card is served to authenticated clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_authenticated_extended_card: Option<bool>,

    /// Detached JWS signatures over the card's canonical JSON.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<AgentCardSignature>,
}

impl AgentCard {
    /// A minimal card serving JSON-RPC at `url`, accepting and producing text.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            protocol_version: default_protocol_version(),
            name: name.into(),
            description: description.into(),
            url: url.into(),
            preferred_transport: None,
            additional_interfaces: Vec::new(),
            icon_url: None,
            provider: None,
            version: version.into(),
            documentation_url: None,
            capabilities: AgentCapabilities::default(),
            security_schemes: BTreeMap::new(),
            security: Vec::new(),
            default_input_modes: vec!["text/plain".into()],
            default_output_modes: vec!["text/plain".into()],
            skills: Vec::new(),
            supports_authenticated_extended_card: None,
            signatures: Vec::new(),
        }
    }

    /// The transport served at `url`.
    pub fn effective_transport(&self) -> TransportProtocol {
        self.preferred_transport.clone().unwrap_or_default()
    }

    /// The interface list including the preferred `(url, transport)` pair.
    pub fn interfaces(&self) -> Vec<AgentInterface> {
        let preferred = AgentInterface {
            url: self.url.clone(),
            transport: self.effective_transport(),
        };
        let mut all = vec![preferred.clone()];
        all.extend(
            self.additional_interfaces
                .iter()
                .filter(|i| **i != preferred)
                .cloned(),
        );
        all
    }

    /// Check if this agent supports streaming.
    pub fn supports_streaming(&self) -> bool {
        self.capabilities.streaming.unwrap_or(false)
    }

    /// Check if this agent supports push notifications.
    pub fn supports_push_notifications(&self) -> bool {
        self.capabilities.push_notifications.unwrap_or(false)
    }

    /// Find a skill by ID.
    pub fn find_skill(&self, skill_id: &str) -> Option<&AgentSkill> {
        self.skills.iter().find(|s| s.id == skill_id)
    }

    /// The card serialized without `signatures`, with object keys sorted.
    ///
    /// Fields filled in by decoding defaults are included, so a card read
    /// without `protocolVersion` gains `"protocolVersion":"0.3.0"` here. Use
    /// [`AgentCard::canonicalize`] on the document as received to reproduce
    /// what its signer signed.
    pub fn canonical_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        Self::canonicalize(serde_json::to_value(self)?)
    }

    /// Canonical form of a card document as received: `signatures` removed,
    /// object keys sorted, nothing added.
    pub fn canonicalize(mut document: Value) -> Result<Vec<u8>, serde_json::Error> {
        if let Some(object) = document.as_object_mut() {
            object.remove("signatures");
        }
        serde_json::to_vec(&document)
    }
}

/// Information about the agent's provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentProvider {
    /// Name of the organization.
    pub organization: String,

    /// URL of the organization.
    pub url: String,
}

/// An additional endpoint and the transport it speaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentInterface {
    pub url: String,
    pub transport: TransportProtocol,
}

/// Transport protocol for an A2A interface.
///
/// Equality and hashing go by the wire name, so `Other("GRPC")` equals
/// `Grpc`. [`TransportProtocol::from`] maps known names to their variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub enum TransportProtocol {
    /// JSON-RPC 2.0 over HTTP(S).
    #[default]
    #[serde(rename = "JSONRPC")]
    JsonRpc,
    /// gRPC.
    #[serde(rename = "GRPC")]
    Grpc,
    /// HTTP + JSON (REST-style).
    #[serde(rename = "HTTP+JSON")]
    HttpJson,
    /// Any other transport name, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl TransportProtocol {
    pub fn as_str(&self) -> &str {
        match self {
            TransportProtocol::JsonRpc => "JSONRPC",
            TransportProtocol::Grpc => "GRPC",
            TransportProtocol::HttpJson => "HTTP+JSON",
            TransportProtocol::Other(name) => name,
        }
    }
}

impl From<&str> for TransportProtocol {
    fn from(name: &str) -> Self {
        match name {
            "JSONRPC" => TransportProtocol::JsonRpc,
            "GRPC" => TransportProtocol::Grpc,
            "HTTP+JSON" => TransportProtocol::HttpJson,
            other => TransportProtocol::Other(other.to_string()),
        }
    }
}

impl From<String> for TransportProtocol {
    fn from(name: String) -> Self {
        match TransportProtocol::from(name.as_str()) {
            TransportProtocol::Other(_) => TransportProtocol::Other(name),
            known => known,
        }
    }
}

impl PartialEq for TransportProtocol {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TransportProtocol {}

impl Hash for TransportProtocol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities declared by the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Whether the agent supports SSE streaming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,

    /// Whether the agent supports push notifications (webhooks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,

    /// Whether the agent exposes status change history for tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_transition_history: Option<bool>,

    /// Declared extensions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<AgentExtension>,
}

/// An extension declared by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentExtension {
    /// URI identifying this extension.
    pub uri: String,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether clients must understand this extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Extension-specific configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Metadata>,
}

/// A specific skill/ability of the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    /// Identifier, unique within the card.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Description of what this skill does.
    pub description: String,

    /// Tags for categorization and search.
    pub tags: Vec<String>,

    /// Example prompts that demonstrate this skill.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,

    /// Accepted input MIME types (overrides the card default).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_modes: Vec<String>,

    /// Output MIME types (overrides the card default).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_modes: Vec<String>,

    /// Security requirements specific to this skill.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

/// A detached JWS signature (RFC 7515) over the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentCardSignature {
    /// Base64url-encoded protected JWS header.
    pub protected: String,

    /// Base64url-encoded signature.
    pub signature: String,

    /// Unprotected JWS header values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Metadata>,
}

/// Failure to interpret a JWS segment.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("segment is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("segment is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentCardSignature {
    /// Decode the protected header (e.g. `alg`, `kid`).
    pub fn protected_header(&self) -> Result<Metadata, SignatureError> {
        let raw = URL_SAFE_NO_PAD
            .decode(&self.protected)
            .or_else(|_| URL_SAFE.decode(&self.protected))?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// The JWS signing input `protected "." base64url(canonical card)`.
    pub fn signing_input(&self, card: &AgentCard) -> Result<String, SignatureError> {
        Ok(self.join(&card.canonical_json()?))
    }

    /// The signing input over the card document exactly as received.
    pub fn signing_input_for(&self, document: &Value) -> Result<String, SignatureError> {
        Ok(self.join(&AgentCard::canonicalize(document.clone())?))
    }

    fn join(&self, payload: &[u8]) -> String {
        format!("{}.{}", self.protected, URL_SAFE_NO_PAD.encode(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::SecurityScheme;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn summarizer() -> AgentCard {
        let mut card = AgentCard::new(
            "summarizer",
            "Summarizes documents with citations",
            "https://agent.example.com/a2a",
            "1.0.0",
        );
        card.provider = Some(AgentProvider {
            organization: "Example Org".into(),
            url: "https://example.com".into(),
        });
        card.capabilities = AgentCapabilities {
            streaming: Some(true),
            push_notifications: Some(true),
            ..Default::default()
        };
        card.security_schemes
            .insert("bearer".into(), SecurityScheme::bearer(Some("JWT".into())));
        card.security = vec![BTreeMap::from([("bearer".to_string(), vec![])])];
        card.skills = vec![AgentSkill {
            id: "summarize".into(),
            name: "Document Summarization".into(),
            description: "Summarizes long documents into concise summaries".into(),
            tags: vec!["summarization".into(), "nlp".into()],
            examples: vec!["Summarize this quarterly report".into()],
            input_modes: vec![],
            output_modes: vec![],
            security: vec![],
        }];
        card
    }

    #[test]
    fn test_serialize_agent_card() {
        let card = summarizer();
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["protocolVersion"], "0.3.0");
        assert_eq!(json["securitySchemes"]["bearer"]["type"], "http");
        assert!(json.get("preferredTransport").is_none());
        assert!(json.get("signatures").is_none());

        // Round-trip
        let parsed: AgentCard = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, card);
        assert!(parsed.supports_streaming());
        assert!(parsed.find_skill("summarize").is_some());
    }

    #[test]
    fn test_transport_literals() {
        let parsed: Vec<TransportProtocol> =
            serde_json::from_value(json!(["JSONRPC", "GRPC", "HTTP+JSON", "WEBSOCKET"])).unwrap();
        assert_eq!(
            parsed,
            vec![
                TransportProtocol::JsonRpc,
                TransportProtocol::Grpc,
                TransportProtocol::HttpJson,
                TransportProtocol::Other("WEBSOCKET".into()),
            ]
        );
        assert_eq!(
            serde_json::to_value(TransportProtocol::HttpJson).unwrap(),
            json!("HTTP+JSON")
        );
    }

    #[test]
    fn test_transport_compares_by_wire_name() {
        let spelled_out = TransportProtocol::Other("GRPC".into());
        assert_eq!(spelled_out, TransportProtocol::Grpc);

        let encoded = serde_json::to_value(&spelled_out).unwrap();
        let decoded: TransportProtocol = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, spelled_out);
        assert!(matches!(decoded, TransportProtocol::Grpc));

        assert!(matches!(TransportProtocol::from("HTTP+JSON"), TransportProtocol::HttpJson));
        assert_eq!(
            TransportProtocol::from(String::from("WEBSOCKET")),
            TransportProtocol::Other("WEBSOCKET".into())
        );
        assert_ne!(TransportProtocol::Other("grpc".into()), TransportProtocol::Grpc);
    }

    #[test]
    fn test_interfaces_lead_with_preferred() {
        let mut card = summarizer();
        card.additional_interfaces = vec![
            AgentInterface {
                url: "https://agent.example.com/a2a".into(),
                transport: TransportProtocol::JsonRpc,
            },
            AgentInterface {
                url: "https://agent.example.com/grpc".into(),
                transport: TransportProtocol::Grpc,
            },
        ];
        let interfaces = card.interfaces();
        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces[0].transport, TransportProtocol::JsonRpc);
        assert_eq!(interfaces[1].transport, TransportProtocol::Grpc);
    }

    #[test]
    fn test_signing_input_ignores_signatures() {
        let protected = URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256","kid":"key-1"}"#);
        let signature = AgentCardSignature {
            protected: protected.clone(),
            signature: "c2ln".into(),
            header: None,
        };
        let header = signature.protected_header().unwrap();
        assert_eq!(header["alg"], "ES256");

        let unsigned = summarizer();
        let mut signed = unsigned.clone();
        signed.signatures.push(signature.clone());

        let input = signature.signing_input(&signed).unwrap();
        assert_eq!(input, signature.signing_input(&unsigned).unwrap());
        assert!(input.starts_with(&format!("{protected}.")));
    }

    #[test]
    fn test_signing_input_over_received_document() {
        let signature = AgentCardSignature {
            protected: URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256"}"#),
            signature: "c2ln".into(),
            header: None,
        };
        let mut document = serde_json::to_value(summarizer()).unwrap();
        document.as_object_mut().unwrap().remove("protocolVersion");
        document["signatures"] = json!([serde_json::to_value(&signature).unwrap()]);

        let received = signature.signing_input_for(&document).unwrap();
        let (_, payload) = received.split_once('.').unwrap();
        let payload = String::from_utf8(URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
        assert!(!payload.contains("protocolVersion"));
        assert!(!payload.contains("signatures"));

        let card: AgentCard = serde_json::from_value(document).unwrap();
        assert_ne!(received, signature.signing_input(&card).unwrap());
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let bytes = summarizer().canonical_json().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let caps = text.find("\"capabilities\"").unwrap();
        let name = text.find("\"name\"").unwrap();
        assert!(caps < name);
    }
}
