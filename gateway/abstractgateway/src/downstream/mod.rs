pub mod configuration;
pub mod idownstream;

pub use configuration::DeviceConfiguration;
pub use idownstream::{PowerState, StateBridge};
