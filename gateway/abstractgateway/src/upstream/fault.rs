//! Error envelopes returned to the platform.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::envelope::{create_event, create_header, Endpoint, Response};
use super::names::{
    ERROR_UNEXPECTED_INFO, ERROR_UNSUPPORTED_OPERATION, NAMESPACE_CONTROL, NAMESPACE_STATUS,
    RESPONSE_ERROR,
};

/// `payload.type` of an `Alexa.ErrorResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    EndpointUnreachable,
    InvalidDirective,
    InternalError,
}

/// Recognized namespace, unrecognized operation name.
pub fn unsupported_operation(correlation_token: Option<&str>) -> Response {
    let header = create_header(NAMESPACE_CONTROL, ERROR_UNSUPPORTED_OPERATION, correlation_token);
    create_event(header, json!({}), None)
}

/// Unrecognized namespace; `fault` is reported as the faulting parameter.
pub fn unexpected_information(fault: &str, correlation_token: Option<&str>) -> Response {
    let header = create_header(NAMESPACE_CONTROL, ERROR_UNEXPECTED_INFO, correlation_token);
    create_event(header, json!({ "faultingParameter": fault }), None)
}

/// Internal failure rendered as a typed envelope instead of an empty response.
pub fn error_response(
    kind: ErrorType,
    message: &str,
    correlation_token: Option<&str>,
    endpoint: Option<Endpoint>,
) -> Response {
    let header = create_header(NAMESPACE_STATUS, RESPONSE_ERROR, correlation_token);
    create_event(header, json!({ "type": kind, "message": message }), endpoint)
}
