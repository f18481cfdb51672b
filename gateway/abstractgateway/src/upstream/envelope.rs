//! Outbound envelope model and its builders.
//!
//! A response document looks like
//! `{ "context"?: { "properties": [...] }, "event": { "header", "endpoint"?, "payload" } }`.
//! Builders only copy fields; the only non-deterministic inputs are the
//! message id and the sample timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use super::names::{PAYLOAD_VERSION, SCOPE_BEARER_TOKEN, UNCERTAINTY_MS};

/// Token placed in endpoint scopes of outbound events.
pub const DEFAULT_SCOPE_TOKEN: &str = "access-token-from-Amazon";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub message_id: String,
    pub namespace: String,
    pub name: String,
    pub payload_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(rename = "type")]
    pub kind: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub endpoint_id: String,
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextProperty {
    pub namespace: String,
    pub name: String,
    pub value: String,
    #[serde(serialize_with = "iso_millis")]
    pub time_of_sample: DateTime<Utc>,
    pub uncertainty_in_milliseconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub properties: Vec<ContextProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub header: Header,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
    pub payload: Value,
}

/// One outbound document, returned to the platform as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    pub event: Event,
}

impl Response {
    pub fn header(&self) -> &Header {
        &self.event.header
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// First reported property value, if the response carries a context.
    pub fn reported_value(&self, name: &str) -> Option<&str> {
        self.context
            .as_ref()?
            .properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// `timeOfSample` uses the JavaScript `toISOString` shape: UTC, millisecond
/// precision, `Z` suffix.
fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn create_message_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn create_header(namespace: &str, name: &str, correlation_token: Option<&str>) -> Header {
    Header {
        message_id: create_message_id(),
        namespace: namespace.to_string(),
        name: name.to_string(),
        payload_version: PAYLOAD_VERSION.to_string(),
        correlation_token: correlation_token.map(str::to_string),
    }
}

pub fn create_context(namespace: &str, name: &str, value: &str) -> Context {
    Context {
        properties: vec![ContextProperty {
            namespace: namespace.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            time_of_sample: Utc::now(),
            uncertainty_in_milliseconds: UNCERTAINTY_MS,
        }],
    }
}

pub fn create_event(header: Header, payload: Value, endpoint: Option<Endpoint>) -> Response {
    Response {
        context: None,
        event: Event {
            header,
            endpoint,
            payload,
        },
    }
}

pub fn create_endpoint(endpoint_id: &str, scope_token: &str) -> Endpoint {
    Endpoint {
        endpoint_id: endpoint_id.to_string(),
        scope: Scope {
            kind: SCOPE_BEARER_TOKEN.to_string(),
            token: scope_token.to_string(),
        },
    }
}

/// Empty `{}` payload used by control and status responses.
pub fn empty_payload() -> Value {
    Value::Object(Default::default())
}
