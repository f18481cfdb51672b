use thiserror::Error;

use crate::upstream::ErrorType;

/// Failures of the device-side state bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("broker connect failed: {0}")]
    Connect(String),
    #[error("state publish failed: {0}")]
    Publish(String),
    #[error("state read failed: {0}")]
    Read(String),
    #[error("state read returned HTTP {status}")]
    Status { status: u16 },
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error("invalid directive: {0}")]
    InvalidDirective(#[source] serde_json::Error),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// Error type reported to the platform for this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            GatewayError::Bridge(_) => ErrorType::EndpointUnreachable,
            GatewayError::InvalidDirective(_) => ErrorType::InvalidDirective,
            GatewayError::Serialization(_) => ErrorType::InternalError,
        }
    }
}
