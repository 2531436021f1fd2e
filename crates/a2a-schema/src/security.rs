//! Security schemes an agent declares in its card, mirroring the OpenAPI
//! Security Scheme Object.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A security scheme, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    /// API key in header, query, or cookie.
    #[serde(rename = "apiKey")]
    ApiKey(ApiKeySecurityScheme),

    /// HTTP authentication (Bearer, Basic, etc.).
    #[serde(rename = "http")]
    Http(HttpAuthSecurityScheme),

    /// OAuth 2.0 flows.
    #[serde(rename = "oauth2")]
    OAuth2(OAuth2SecurityScheme),

    /// OpenID Connect discovery.
    #[serde(rename = "openIdConnect")]
    OpenIdConnect(OpenIdConnectSecurityScheme),
}

impl SecurityScheme {
    /// Bearer-token HTTP authentication.
    pub fn bearer(bearer_format: Option<String>) -> Self {
        Self::Http(HttpAuthSecurityScheme {
            scheme: "bearer".into(),
            bearer_format,
            description: None,
        })
    }

    /// The `type` literal of this scheme.
    pub fn scheme_type(&self) -> &'static str {
        match self {
            SecurityScheme::ApiKey(_) => "apiKey",
            SecurityScheme::Http(_) => "http",
            SecurityScheme::OAuth2(_) => "oauth2",
            SecurityScheme::OpenIdConnect(_) => "openIdConnect",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SecurityScheme::ApiKey(s) => s.description.as_deref(),
            SecurityScheme::Http(s) => s.description.as_deref(),
            SecurityScheme::OAuth2(s) => s.description.as_deref(),
            SecurityScheme::OpenIdConnect(s) => s.description.as_deref(),
        }
    }
}

/// `type: "apiKey"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeySecurityScheme {
    /// Where the key is sent.
    #[serde(rename = "in")]
    pub location: ApiKeyLocation,

    /// Name of the header, query or cookie parameter.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Location for API key security scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

/// `type: "http"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpAuthSecurityScheme {
    /// RFC 7235 scheme name, case-insensitive (e.g. "bearer").
    pub scheme: String,

    /// Hint about how bearer tokens are formatted (e.g. "JWT").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `type: "oauth2"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2SecurityScheme {
    pub flows: OAuthFlows,

    /// RFC 8414 authorization server metadata URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth2_metadata_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `type: "openIdConnect"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenIdConnectSecurityScheme {
    /// Well-known URL of the OpenID Connect discovery document.
    pub open_id_connect_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The OAuth flows a scheme supports. At least one should be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlows {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<AuthorizationCodeOAuthFlow>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<ClientCredentialsOAuthFlow>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit: Option<ImplicitOAuthFlow>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordOAuthFlow>,
}

impl OAuthFlows {
    pub fn is_empty(&self) -> bool {
        self.authorization_code.is_none()
            && self.client_credentials.is_none()
            && self.implicit.is_none()
            && self.password.is_none()
    }

    /// Every URL declared by the configured flows, labelled by field path.
    pub fn urls(&self) -> Vec<(&'static str, &str)> {
        let mut urls = Vec::new();
        if let Some(flow) = &self.authorization_code {
            urls.push(("authorizationCode.authorizationUrl", flow.authorization_url.as_str()));
            urls.push(("authorizationCode.tokenUrl", flow.token_url.as_str()));
            if let Some(refresh) = &flow.refresh_url {
                urls.push(("authorizationCode.refreshUrl", refresh.as_str()));
            }
        }
        if let Some(flow) = &self.client_credentials {
            urls.push(("clientCredentials.tokenUrl", flow.token_url.as_str()));
            if let Some(refresh) = &flow.refresh_url {
                urls.push(("clientCredentials.refreshUrl", refresh.as_str()));
            }
        }
        if let Some(flow) = &self.implicit {
            urls.push(("implicit.authorizationUrl", flow.authorization_url.as_str()));
            if let Some(refresh) = &flow.refresh_url {
                urls.push(("implicit.refreshUrl", refresh.as_str()));
            }
        }
        if let Some(flow) = &self.password {
            urls.push(("password.tokenUrl", flow.token_url.as_str()));
            if let Some(refresh) = &flow.refresh_url {
                urls.push(("password.refreshUrl", refresh.as_str()));
            }
        }
        urls
    }
}

/// Scope name → short description. May be empty.
pub type Scopes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationCodeOAuthFlow {
    pub authorization_url: String,
    pub token_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: Scopes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientCredentialsOAuthFlow {
    pub token_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: Scopes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImplicitOAuthFlow {
    pub authorization_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: Scopes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordOAuthFlow {
    pub token_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: Scopes,
}
