use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Header carrying the opaque caller identity.
pub const USER_HEADER: &str = "x-osmo-user";
/// Header carrying the caller's comma-separated role names.
pub const ROLES_HEADER: &str = "x-osmo-roles";
/// Role implicitly appended to every caller, granting public endpoints.
pub const DEFAULT_ROLE: &str = "osmo-default";

/// The single unary operation the gateway invokes per inbound request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributeContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<HttpAttributes>,
}

/// HTTP attributes of the request under authorization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpAttributes {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CheckStatus {
    Ok,
    PermissionDenied,
    InvalidArgument,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_response: Option<DeniedHttpResponse>,
}

/// The HTTP response the gateway should replay to a denied caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeniedHttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl CheckRequest {
    /// Convenience constructor used by the SDK, the CLI and tests.
    #[must_use]
    pub fn new(method: &str, path: &str, user: &str, roles: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert(USER_HEADER.to_string(), user.to_string());
        headers.insert(ROLES_HEADER.to_string(), roles.to_string());
        Self {
            attributes: Some(AttributeContext {
                request: Some(HttpAttributes {
                    method: method.to_string(),
                    path: path.to_string(),
                    headers,
                    body: None,
                }),
            }),
        }
    }

    #[must_use]
    pub fn http(&self) -> Option<&HttpAttributes> {
        self.attributes.as_ref().and_then(|attrs| attrs.request.as_ref())
    }
}

impl HttpAttributes {
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.headers.get(USER_HEADER).map(String::as_str)
    }

    /// Role names from the roles header, comma-split and trimmed. An absent
    /// or empty header yields no roles.
    #[must_use]
    pub fn role_names(&self) -> Vec<String> {
        self.headers
            .get(ROLES_HEADER)
            .map(String::as_str)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

impl CheckResponse {
    #[must_use]
    pub fn allowed() -> Self {
        Self {
            status: CheckStatus::Ok,
            denied_response: None,
        }
    }

    /// A deny carrying the 403 the gateway returns verbatim.
    #[must_use]
    pub fn denied(status: CheckStatus, body: impl Into<String>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());
        Self {
            status,
            denied_response: Some(DeniedHttpResponse {
                status_code: http::StatusCode::FORBIDDEN.as_u16(),
                headers,
                body: body.into(),
            }),
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.status == CheckStatus::Ok
    }
}
