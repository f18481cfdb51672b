use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::envelope::Header;

/// Schema-free directive payload (`payload: {}` on the wire).
pub type Payload = Map<String, Value>;

/// Top-level inbound document: `{ "directive": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveRequest {
    pub directive: Directive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub header: DirectiveHeader,

    /// Endpoint reference sent by the platform. Accepted but not interpreted;
    /// the gateway drives a single configured device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Value>,

    #[serde(default)]
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveHeader {
    pub namespace: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_version: Option<String>,
}

impl DirectiveRequest {
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(raw)
    }

    pub fn correlation_token(&self) -> Option<&str> {
        self.directive.correlation_token()
    }
}

impl Directive {
    pub fn correlation_token(&self) -> Option<&str> {
        self.header.correlation_token.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }
}

impl From<Header> for DirectiveHeader {
    fn from(h: Header) -> Self {
        Self {
            namespace: h.namespace,
            name: h.name,
            message_id: Some(h.message_id),
            correlation_token: h.correlation_token,
            payload_version: Some(h.payload_version),
        }
    }
}

/// Build a directive document from an outbound-style header, the mirror image
/// of [`create_event`](super::envelope::create_event).
pub fn create_directive(header: Header, payload: Payload) -> DirectiveRequest {
    DirectiveRequest {
        directive: Directive {
            header: header.into(),
            endpoint: None,
            payload,
        },
    }
}
