//! Namespaces, operation names and fixed values of the assistant's
//! smart-home message schema (payload version 3).

pub const NAMESPACE_DISCOVERY: &str = "Alexa.Discovery";
pub const NAMESPACE_CONTROL: &str = "Alexa.PowerController";
pub const NAMESPACE_STATUS: &str = "Alexa";

pub const REQUEST_DISCOVER: &str = "Discover.Request";
pub const RESPONSE_DISCOVER: &str = "Discover.Response";

pub const REQUEST_TURN_ON: &str = "TurnOn";
pub const REQUEST_TURN_OFF: &str = "TurnOff";
pub const PROPERTY_POWER_STATE: &str = "powerState";

pub const REQUEST_REPORT_STATE: &str = "ReportState";
pub const RESPONSE_STATE_REPORT: &str = "StateReport";
pub const RESPONSE: &str = "Response";
pub const RESPONSE_ERROR: &str = "ErrorResponse";

pub const ERROR_UNSUPPORTED_OPERATION: &str = "UnsupportedOperationError";
pub const ERROR_UNEXPECTED_INFO: &str = "UnexpectedInformationReceivedError";

pub const PAYLOAD_VERSION: &str = "3";
pub const UNCERTAINTY_MS: u64 = 500;

pub const SCOPE_BEARER_TOKEN: &str = "BearerToken";
pub const CAPABILITY_TYPE: &str = "AlexaInterface";

/// Routing key of an inbound directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespace {
    Discovery,
    PowerController,
    Alexa,
    /// Anything we do not route; carries the raw namespace for fault reporting.
    Other(String),
}

impl Namespace {
    pub fn parse(raw: &str) -> Self {
        match raw {
            NAMESPACE_DISCOVERY => Namespace::Discovery,
            NAMESPACE_CONTROL => Namespace::PowerController,
            NAMESPACE_STATUS => Namespace::Alexa,
            other => Namespace::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Namespace::Discovery => NAMESPACE_DISCOVERY,
            Namespace::PowerController => NAMESPACE_CONTROL,
            Namespace::Alexa => NAMESPACE_STATUS,
            Namespace::Other(raw) => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_parse() {
        assert_eq!(Namespace::parse("Alexa.Discovery"), Namespace::Discovery);
        assert_eq!(Namespace::parse("Alexa.PowerController"), Namespace::PowerController);
        assert_eq!(Namespace::parse("Alexa"), Namespace::Alexa);

        // Matching is exact; no case folding.
        let other = Namespace::parse("alexa.powercontroller");
        assert_eq!(other, Namespace::Other("alexa.powercontroller".to_string()));
        assert_eq!(other.as_str(), "alexa.powercontroller");
    }
}
