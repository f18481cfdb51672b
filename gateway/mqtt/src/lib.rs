pub mod config;
pub mod downstreaminterface;

pub mod models;

pub use config::{Args, BrokerConfig};
pub use downstreaminterface::MqttDownstream;
pub use models::types::MqttPublish;
