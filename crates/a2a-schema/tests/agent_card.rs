//! Decoding published agent cards.

use a2a_schema::{Codec, ErrorCode, SecurityScheme, TransportProtocol, ValidationConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn published_card() -> Value {
    json!({
        "protocolVersion": "0.3.0",
        "name": "GeoSpatial Route Planner Agent",
        "description": "Provides advanced route planning, traffic analysis, and custom map generation services.",
        "url": "https://georoute-agent.example.com/a2a/v1",
        "preferredTransport": "JSONRPC",
        "additionalInterfaces": [
            {"url": "https://georoute-agent.example.com/a2a/v1", "transport": "JSONRPC"},
            {"url": "https://georoute-agent.example.com/a2a/grpc", "transport": "GRPC"},
            {"url": "https://georoute-agent.example.com/a2a/json", "transport": "HTTP+JSON"}
        ],
        "provider": {"organization": "Example Geo Services Inc.", "url": "https://www.examplegeoservices.com"},
        "iconUrl": "https://georoute-agent.example.com/icon.png",
        "version": "1.2.0",
        "documentationUrl": "https://docs.examplegeoservices.com/georoute-agent/api",
        "capabilities": {"streaming": true, "pushNotifications": true, "stateTransitionHistory": false},
        "securitySchemes": {
            "google": {"type": "openIdConnect", "openIdConnectUrl": "https://accounts.google.com/.well-known/openid-configuration"}
        },
        "security": [{"google": ["openid", "profile", "email"]}],
        "defaultInputModes": ["application/json", "text/plain"],
        "defaultOutputModes": ["application/json", "image/png"],
        "skills": [
            {
                "id": "route-optimizer-traffic",
                "name": "Traffic-Aware Route Optimizer",
                "description": "Calculates the optimal driving route between two or more locations.",
                "tags": ["maps", "routing", "navigation"],
                "examples": ["Plan a route from '1600 Amphitheatre Parkway' to 'San Francisco'."],
                "inputModes": ["application/json", "text/plain"],
                "outputModes": ["application/json", "application/vnd.geo+json", "text/html"]
            },
            {
                "id": "custom-map-generator",
                "name": "Personalized Map Generator",
                "description": "Creates custom map images based on user-defined points of interest.",
                "tags": ["maps", "customization", "visualization"]
            }
        ],
        "supportsAuthenticatedExtendedCard": true,
        "signatures": [
            {
                "protected": "eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCIsImtpZCI6ImtleS0xIiwiamt1IjoiaHR0cHM6Ly9leGFtcGxlLmNvbS9hZ2VudC9qd2tzLmpzb24ifQ",
                "signature": "QFdkNLNszlGj3z3u0YQGt_T9LixY3qtdQpZmsTdDHDe3fXV9y9-B3m2-XgCpzuhiLt8E0tV6HXoZKHv4GtHgKQ"
            }
        ]
    })
}

#[test]
fn published_card_decodes() {
    let card = Codec::default().decode_agent_card_value(published_card()).unwrap();
    assert_eq!(card.effective_transport(), TransportProtocol::JsonRpc);
    assert_eq!(card.interfaces().len(), 3);
    assert!(card.supports_streaming());
    assert!(matches!(
        card.security_schemes.get("google"),
        Some(SecurityScheme::OpenIdConnect(_))
    ));
    assert_eq!(card.find_skill("custom-map-generator").unwrap().tags.len(), 3);

    let header = card.signatures[0].protected_header().unwrap();
    assert_eq!(header["alg"], "ES256");
    assert_eq!(header["kid"], "key-1");

    // encode then decode yields the same card
    let text = Codec::default().encode(&card).unwrap();
    assert_eq!(Codec::default().decode_agent_card(&text).unwrap(), card);
}

#[test]
fn undeclared_scheme_is_rejected() {
    let mut raw = published_card();
    raw["security"] = json!([{"oauth": ["read"]}]);
    let err = Codec::default().decode_agent_card_value(raw).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidAgentResponse);
    assert_eq!(err.data().unwrap()["path"], "security[0]");
}

#[test]
fn relative_urls_depend_on_config() {
    let mut raw = published_card();
    raw["iconUrl"] = json!("/icon.png");

    let err = Codec::default().decode_agent_card_value(raw.clone()).unwrap_err();
    assert_eq!(err.data().unwrap()["path"], "iconUrl");

    let lenient = Codec::new(ValidationConfig::lenient());
    assert!(lenient.decode_agent_card_value(raw).is_ok());
}

#[test]
fn unknown_transport_is_kept() {
    let mut raw = published_card();
    raw["additionalInterfaces"][2]["transport"] = json!("WEBSOCKET");
    let card = Codec::default().decode_agent_card_value(raw).unwrap();
    assert_eq!(
        card.additional_interfaces[2].transport,
        TransportProtocol::Other("WEBSOCKET".into())
    );
}
