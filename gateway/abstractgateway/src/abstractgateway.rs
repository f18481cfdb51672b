use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::downstream::{DeviceConfiguration, PowerState, StateBridge};
use crate::error::{GatewayError, GatewayResult};
use crate::upstream::directive::{Directive, DirectiveRequest};
use crate::upstream::discovery::create_discovery_payload;
use crate::upstream::envelope::{
    create_context, create_endpoint, create_event, create_header, empty_payload, Response,
    DEFAULT_SCOPE_TOKEN,
};
use crate::upstream::fault;
use crate::upstream::names::{
    Namespace, NAMESPACE_CONTROL, NAMESPACE_DISCOVERY, NAMESPACE_STATUS, PROPERTY_POWER_STATE,
    REQUEST_DISCOVER, REQUEST_REPORT_STATE, REQUEST_TURN_OFF, REQUEST_TURN_ON, RESPONSE,
    RESPONSE_DISCOVER, RESPONSE_STATE_REPORT,
};

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub device: DeviceConfiguration,
    /// Bearer token placed in the endpoint scope of outbound events.
    pub scope_token: String,
}

impl GatewayConfig {
    pub fn new(device: DeviceConfiguration) -> Self {
        Self {
            device,
            scope_token: DEFAULT_SCOPE_TOKEN.to_string(),
        }
    }
}

/// Gateway = device configuration + state bridge. Stateless between
/// invocations; every call to [`Gateway::dispatch`] yields exactly one
/// envelope or a typed error.
pub struct Gateway<B> {
    config: GatewayConfig,
    bridge: B,
}

impl<B: StateBridge> Gateway<B> {
    pub fn new(config: GatewayConfig, bridge: B) -> Self {
        Self { config, bridge }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Route a directive by namespace, then by operation name.
    pub async fn dispatch(&self, request: &DirectiveRequest) -> GatewayResult<Response> {
        log_message("Received Directive", request);

        let directive = &request.directive;
        match Namespace::parse(&directive.header.namespace) {
            Namespace::Discovery => self.handle_discovery(directive),
            Namespace::PowerController => self.handle_control(directive).await,
            Namespace::Alexa => self.handle_status(directive).await,
            other @ Namespace::Other(_) => {
                let ns = other.as_str();
                Ok(self.reject(
                    &format!("Unsupported namespace: {ns}"),
                    fault::unexpected_information(ns, directive.correlation_token()),
                ))
            }
        }
    }

    /// Parse a raw inbound document and dispatch it.
    pub async fn dispatch_value(&self, raw: Value) -> GatewayResult<Response> {
        let request = DirectiveRequest::from_value(raw).map_err(GatewayError::InvalidDirective)?;
        self.dispatch(&request).await
    }

    /// Like [`Gateway::dispatch_value`], but failures become an
    /// `ErrorResponse` envelope. Never yields an empty response.
    pub async fn respond(&self, raw: Value) -> Response {
        let token = raw
            .pointer("/directive/header/correlationToken")
            .and_then(Value::as_str)
            .map(str::to_string);

        match self.dispatch_value(raw).await {
            Ok(response) => response,
            Err(e) => {
                error!("dispatch failed: {e}");
                let endpoint = matches!(e, GatewayError::Bridge(_)).then(|| self.endpoint());
                let response =
                    fault::error_response(e.error_type(), &e.to_string(), token.as_deref(), endpoint);
                log_message("Error", &response);
                response
            }
        }
    }

    /// Log why a directive was refused, then the fault envelope returned for it.
    fn reject(&self, reason: &str, response: Response) -> Response {
        log_error(reason);
        log_message("Error", &response);
        response
    }

    fn unsupported_operation(&self, directive: &Directive) -> Response {
        self.reject(
            &format!("Unsupported operation {}", directive.name()),
            fault::unsupported_operation(directive.correlation_token()),
        )
    }

    fn endpoint(&self) -> crate::upstream::Endpoint {
        create_endpoint(&self.config.device.device_id, &self.config.scope_token)
    }

    fn handle_discovery(&self, directive: &Directive) -> GatewayResult<Response> {
        if directive.name() != REQUEST_DISCOVER {
            return Ok(self.unsupported_operation(directive));
        }

        let header = create_header(
            NAMESPACE_DISCOVERY,
            RESPONSE_DISCOVER,
            directive.correlation_token(),
        );
        let payload = serde_json::to_value(create_discovery_payload(&self.config.device))?;

        let response = create_event(header, payload, None);
        log_message("Sent Discovery", &response);
        Ok(response)
    }

    async fn handle_control(&self, directive: &Directive) -> GatewayResult<Response> {
        let (desired, title) = match directive.name() {
            REQUEST_TURN_ON => (PowerState::On, "Sent Switch On"),
            REQUEST_TURN_OFF => (PowerState::Off, "Sent Switch Off"),
            _ => return Ok(self.unsupported_operation(directive)),
        };

        self.bridge
            .set_state(&self.config.device.device_id, desired)
            .await?;

        let response = self.power_state_event(RESPONSE, desired.as_str(), directive);
        log_message(title, &response);
        Ok(response)
    }

    async fn handle_status(&self, directive: &Directive) -> GatewayResult<Response> {
        if directive.name() != REQUEST_REPORT_STATE {
            return Ok(self.unsupported_operation(directive));
        }

        let state = self.bridge.get_state(&self.config.device.device_id).await?;

        let response = self.power_state_event(RESPONSE_STATE_REPORT, &state, directive);
        log_message("Sent Status Report", &response);
        Ok(response)
    }

    /// `Alexa.<name>` event for the device with a `powerState` context.
    fn power_state_event(&self, name: &str, value: &str, directive: &Directive) -> Response {
        let context = create_context(NAMESPACE_CONTROL, PROPERTY_POWER_STATE, value);
        let header = create_header(NAMESPACE_STATUS, name, directive.correlation_token());
        create_event(header, empty_payload(), Some(self.endpoint())).with_context(context)
    }
}

/// One diagnostic line per step: `**** <title>: <json>`.
fn log_message<T: Serialize + ?Sized>(title: &str, msg: &T) {
    match serde_json::to_string(msg) {
        Ok(json) => info!("**** {title}: {json}"),
        Err(e) => warn!("**** {title}: <unserializable: {e}>"),
    }
}

fn log_error(msg: &str) {
    log_message("Error", msg);
}
