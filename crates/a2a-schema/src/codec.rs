//! Decoding untrusted JSON into typed A2A values, and encoding them back.
//!
//! Request decoding is staged so that each failure maps to its JSON-RPC code:
//! unparsable text is a parse error, a malformed envelope is an invalid
//! request, an unknown method is method-not-found, and params that do not fit
//! the method (in shape or by [`Validate`] rules) are invalid params.
//! Everything that goes wrong on the response side is an invalid agent
//! response.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::agent_card::AgentCard;
use crate::config::{SupersededShapePolicy, ValidationConfig};
use crate::error::{A2AError, A2AResult};
use crate::request::{A2ARequest, Method};
use crate::response::{A2AResponse, SendStreamingMessageResponse};
use crate::transport::jsonrpc::{peek_request_id, JsonRpcErrorResponse, JsonRpcRequest};
use crate::transport::stream::{sse_data_payloads, StreamSequence};
use crate::validate::Validate;

/// Stateless encoder/decoder bound to a [`ValidationConfig`].
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: ValidationConfig,
}

fn reason(err: impl Display) -> Value {
    json!({ "reason": err.to_string() })
}

impl Codec {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    // ── Requests ─────────────────────────────────────────────

    /// Decode request text. On failure, returns the error response to send,
    /// echoing the request id when it could be read.
    pub fn decode_request(&self, text: &str) -> Result<A2ARequest, JsonRpcErrorResponse> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| JsonRpcErrorResponse::new(None, A2AError::parse_error(e.to_string())))?;
        self.decode_request_value(value)
    }

    /// Decode an already-parsed request.
    pub fn decode_request_value(&self, value: Value) -> Result<A2ARequest, JsonRpcErrorResponse> {
        let id = peek_request_id(&value);
        let reject = |error: A2AError| {
            debug!(code = error.code().code(), id = ?id, "rejected request");
            JsonRpcErrorResponse::new(id.clone(), error)
        };

        if value.is_array() {
            return Err(reject(A2AError::invalid_request(
                "batch requests are not supported",
            )));
        }
        if !value.is_object() {
            return Err(reject(A2AError::invalid_request("request must be an object")));
        }

        let raw: JsonRpcRequest = serde_json::from_value(value)
            .map_err(|e| reject(A2AError::invalid_request(e.to_string())))?;
        let request = A2ARequest::try_from(raw).map_err(reject)?;
        request
            .validate(&self.config)
            .map_err(|v| reject(A2AError::invalid_params(v)))?;

        debug!(method = %request.method(), id = %request.id(), "decoded request");
        Ok(request)
    }

    // ── Responses ────────────────────────────────────────────

    /// Decode the response to a request for `method`.
    pub fn decode_response(&self, method: Method, text: &str) -> A2AResult<A2AResponse> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| A2AError::invalid_agent_response(reason(e)))?;
        self.decode_response_value(method, value)
    }

    pub fn decode_response_value(&self, method: Method, value: Value) -> A2AResult<A2AResponse> {
        let response = A2AResponse::from_value(method, value)
            .map_err(|e| A2AError::invalid_agent_response(reason(e)))?;
        response
            .validate(&self.config)
            .map_err(A2AError::invalid_agent_response)?;

        debug!(
            %method,
            id = ?response.id(),
            error = response.is_error(),
            "decoded response"
        );
        Ok(response)
    }

    /// Decode every response of a streaming call, in arrival order.
    ///
    /// `body` is either an SSE body (`data:` lines) or one JSON response per
    /// line. All responses must answer the same request id and no event may
    /// follow its task's final status update.
    pub fn decode_stream(
        &self,
        method: Method,
        body: &str,
    ) -> A2AResult<Vec<SendStreamingMessageResponse>> {
        if !method.is_streaming() {
            return Err(A2AError::unsupported_operation(&format!(
                "{method} does not stream"
            )));
        }
        let payloads: Vec<String> = if body.lines().any(|l| l.starts_with("data:")) {
            sse_data_payloads(body)
        } else {
            body.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect()
        };

        let mut sequence = StreamSequence::new();
        let mut responses: Vec<SendStreamingMessageResponse> = Vec::with_capacity(payloads.len());
        for (index, payload) in payloads.iter().enumerate() {
            let at = |data: Value| {
                A2AError::invalid_agent_response(json!({ "event": index, "detail": data }))
            };
            let response: SendStreamingMessageResponse =
                serde_json::from_str(payload).map_err(|e| at(reason(e)))?;
            response
                .validate(&self.config)
                .map_err(|v| at(v.into()))?;

            if let Some(first) = responses.first() {
                if first.id() != response.id() {
                    return Err(at(reason(format!(
                        "response id {:?} does not match the stream's id {:?}",
                        response.id(),
                        first.id()
                    ))));
                }
            }
            if let Some(item) = response.result() {
                sequence.push(item).map_err(|e| at(reason(e)))?;
            }
            responses.push(response);
        }

        debug!(%method, events = responses.len(), "decoded stream");
        Ok(responses)
    }

    // ── Entities ─────────────────────────────────────────────

    /// Decode a published agent card.
    pub fn decode_agent_card(&self, text: &str) -> A2AResult<AgentCard> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| A2AError::invalid_agent_response(reason(e)))?;
        self.decode_agent_card_value(value)
    }

    pub fn decode_agent_card_value(&self, value: Value) -> A2AResult<AgentCard> {
        let superseded = value.is_object() && value.get("protocolVersion").is_none();
        if superseded {
            match self.config.superseded_shapes {
                SupersededShapePolicy::Accept => {
                    warn!("agent card has no protocolVersion; reading it as the superseded schema")
                }
                SupersededShapePolicy::Reject => {
                    return Err(A2AError::invalid_agent_response(reason(
                        "agent card has no protocolVersion",
                    )))
                }
            }
        }

        let card: AgentCard = serde_json::from_value(value)
            .map_err(|e| A2AError::invalid_agent_response(reason(e)))?;
        card.validate(&self.config)
            .map_err(A2AError::invalid_agent_response)?;

        debug!(name = %card.name, version = %card.protocol_version, "decoded agent card");
        Ok(card)
    }

    /// Decode and validate any entity; failures are invalid params.
    pub fn decode<T: DeserializeOwned + Validate>(&self, value: Value) -> A2AResult<T> {
        let entity: T =
            serde_json::from_value(value).map_err(|e| A2AError::invalid_params(reason(e)))?;
        entity
            .validate(&self.config)
            .map_err(A2AError::invalid_params)?;
        Ok(entity)
    }

    // ── Encoding ─────────────────────────────────────────────

    /// Encode to JSON text. Absent optional fields are omitted.
    pub fn encode<T: Serialize>(&self, value: &T) -> A2AResult<String> {
        serde_json::to_string(value).map_err(|e| A2AError::internal_error(e.to_string()))
    }

    pub fn encode_value<T: Serialize>(&self, value: &T) -> A2AResult<Value> {
        serde_json::to_value(value).map_err(|e| A2AError::internal_error(e.to_string()))
    }
}
