use std::path::PathBuf;

use abstractgateway::downstream::configuration::{
    DEFAULT_DESCRIPTION, DEFAULT_FRIENDLY_NAME, DEFAULT_MANUFACTURER,
};
use abstractgateway::{DeviceConfiguration, GatewayConfig};
use clap::Parser;

pub const DEFAULT_BROKER: &str = "broker.shiftr.io";
pub const DEFAULT_CLIENT_ID: &str = "Alexa";

/// Connection settings for the hosted broker, shared by the MQTT publish and
/// the HTTP state read.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub key: String,
    pub secret: String,
    pub keep_alive_secs: u64,
    /// Base URL of the state read endpoint; `https://<host>` when unset.
    pub state_url: Option<String>,
}

impl BrokerConfig {
    pub fn new(host: impl Into<String>, key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 1883,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            key: key.into(),
            secret: secret.into(),
            keep_alive_secs: 30,
            state_url: None,
        }
    }

    pub fn state_base_url(&self) -> String {
        match &self.state_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.host),
        }
    }
}

/// Command-line and environment configuration, read once at start-up.
#[derive(Parser, Debug, Clone)]
#[command(name = "kettle-gateway", about = "Answer one smart-home directive for the kettle")]
pub struct Args {
    /// Directive JSON file; stdin when omitted
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,

    #[arg(long, env = "MQTT_BROKER", default_value = DEFAULT_BROKER)]
    pub broker: String,
    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    pub port: u16,
    #[arg(long, env = "MQTT_CLIENT_ID", default_value = DEFAULT_CLIENT_ID)]
    pub client_id: String,

    #[arg(long, env = "MQTT_KEY", hide_env_values = true)]
    pub key: String,
    #[arg(long, env = "MQTT_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Base URL of the broker's state read endpoint
    #[arg(long, env = "STATE_URL")]
    pub state_url: Option<String>,

    #[arg(long, env = "DEVICE_ID")]
    pub device_id: String,

    #[arg(long, env = "DEVICE_FRIENDLY_NAME", default_value = DEFAULT_FRIENDLY_NAME)]
    pub friendly_name: String,
    #[arg(long, env = "DEVICE_DESCRIPTION", default_value = DEFAULT_DESCRIPTION)]
    pub description: String,
    #[arg(long, env = "DEVICE_MANUFACTURER", default_value = DEFAULT_MANUFACTURER)]
    pub manufacturer: String,
    #[arg(
        long = "display-category",
        env = "DEVICE_DISPLAY_CATEGORIES",
        value_delimiter = ',',
        default_value = "SWITCH"
    )]
    pub display_categories: Vec<String>,
}

impl Args {
    pub fn broker_config(&self) -> BrokerConfig {
        BrokerConfig {
            host: self.broker.clone(),
            port: self.port,
            client_id: self.client_id.clone(),
            key: self.key.clone(),
            secret: self.secret.clone(),
            keep_alive_secs: 30,
            state_url: self.state_url.clone(),
        }
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        let device = DeviceConfiguration::new(self.device_id.clone())
            .friendly_name(self.friendly_name.clone())
            .description(self.description.clone())
            .manufacturer_name(self.manufacturer.clone())
            .display_categories(self.display_categories.clone());
        GatewayConfig::new(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 7] = [
        "kettle-gateway",
        "--key",
        "k",
        "--secret",
        "s",
        "--device-id",
        "kettle-1",
    ];

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(REQUIRED).unwrap();
        let broker = args.broker_config();

        assert_eq!(broker.host, "broker.shiftr.io");
        assert_eq!(broker.port, 1883);
        assert_eq!(broker.client_id, "Alexa");
        assert_eq!(broker.state_base_url(), "https://broker.shiftr.io");

        let gw = args.gateway_config();
        assert_eq!(gw.device.device_id, "kettle-1");
        assert_eq!(gw.device.friendly_name, "Kettle");
        assert_eq!(gw.device.display_categories, vec!["SWITCH".to_string()]);
    }

    #[test]
    fn test_overrides() {
        let mut argv = REQUIRED.to_vec();
        argv.extend([
            "--broker",
            "mqtt.example.org",
            "--state-url",
            "http://127.0.0.1:8080/",
            "--display-category",
            "SWITCH,OTHER",
            "--pretty",
        ]);
        let args = Args::try_parse_from(argv).unwrap();

        assert!(args.pretty);
        assert_eq!(args.broker_config().state_base_url(), "http://127.0.0.1:8080");
        assert_eq!(
            args.gateway_config().device.display_categories,
            vec!["SWITCH".to_string(), "OTHER".to_string()]
        );
    }

    #[test]
    fn test_state_url_defaults_to_broker_host() {
        let cfg = BrokerConfig::new("broker.local", "k", "s");
        assert_eq!(cfg.state_base_url(), "https://broker.local");
    }
}
