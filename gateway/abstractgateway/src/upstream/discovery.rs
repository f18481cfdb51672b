use serde::{Deserialize, Serialize};

use super::names::{CAPABILITY_TYPE, NAMESPACE_CONTROL, PAYLOAD_VERSION, PROPERTY_POWER_STATE};
use crate::downstream::DeviceConfiguration;

/// Payload of a `Discover.Response` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryPayload {
    pub endpoints: Vec<DiscoveryEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryEndpoint {
    pub endpoint_id: String,
    pub friendly_name: String,
    pub description: String,
    pub manufacturer_name: String,
    pub display_categories: Vec<String>,
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(rename = "type")]
    pub kind: String,
    pub interface: String,
    pub version: String,
    pub properties: CapabilityProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityProperties {
    pub supported: Vec<SupportedProperty>,
    pub proactively_reported: bool,
    pub retrievable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedProperty {
    pub name: String,
}

pub fn power_controller_capability() -> Capability {
    Capability {
        kind: CAPABILITY_TYPE.to_string(),
        interface: NAMESPACE_CONTROL.to_string(),
        version: PAYLOAD_VERSION.to_string(),
        properties: CapabilityProperties {
            supported: vec![SupportedProperty {
                name: PROPERTY_POWER_STATE.to_string(),
            }],
            proactively_reported: true,
            retrievable: true,
        },
    }
}

/// The gateway exposes exactly one endpoint: the configured device.
pub fn create_discovery_payload(device: &DeviceConfiguration) -> DiscoveryPayload {
    DiscoveryPayload {
        endpoints: vec![DiscoveryEndpoint {
            endpoint_id: device.device_id.clone(),
            friendly_name: device.friendly_name.clone(),
            description: device.description.clone(),
            manufacturer_name: device.manufacturer_name.clone(),
            display_categories: device.display_categories.clone(),
            capabilities: vec![power_controller_capability()],
        }],
    }
}
