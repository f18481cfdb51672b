//! Kettle smart-home gateway core library.
//!
//! `upstream` models the assistant side (directives in, envelopes out),
//! `downstream` models the device side (configuration and the state bridge),
//! and [`Gateway`] routes one to the other.
pub mod upstream;
pub mod downstream;
pub mod abstractgateway;
pub mod error;

pub use abstractgateway::{Gateway, GatewayConfig};
pub use downstream::{DeviceConfiguration, PowerState, StateBridge};
pub use error::{BridgeError, GatewayError, GatewayResult};
pub use upstream::{Directive, DirectiveRequest, Response};
