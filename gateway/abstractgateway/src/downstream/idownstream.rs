use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Binary device state as carried on the broker (`"ON"` / `"OFF"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::On => "ON",
            PowerState::Off => "OFF",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device side of the gateway: the state of record lives behind this trait,
/// never in the process.
#[async_trait]
pub trait StateBridge: Send + Sync {
    /// Publish the desired state. Returns once the message has left the
    /// client and the connection has been released.
    async fn set_state(&self, device_id: &str, desired: PowerState) -> Result<(), BridgeError>;

    /// Read the last reported state. The raw body is returned unvalidated.
    async fn get_state(&self, device_id: &str) -> Result<String, BridgeError>;
}
