use abstractgateway::PowerState;
use rumqttc::QoS;

/// ---- Transport-level MQTT types ----

#[derive(Debug, Clone, PartialEq)]
pub struct MqttPublish {
    pub topic: String,
    pub payload: Vec<u8>,
    pub retain: bool,
    pub qos: QoS,
}

/// Topic the device listens on for its desired state.
pub fn desired_topic(device_id: &str) -> String {
    format!("/{device_id}/desired")
}

/// Broker-side path holding the device's last reported state.
pub fn actual_path(device_id: &str) -> String {
    format!("/{device_id}/actual")
}

impl MqttPublish {
    /// Plain-text `ON`/`OFF` to the device's desired topic, QoS 0, not retained.
    pub fn desired_state(device_id: &str, state: PowerState) -> Self {
        Self {
            topic: desired_topic(device_id),
            payload: state.as_str().as_bytes().to_vec(),
            retain: false,
            qos: QoS::AtMostOnce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_state_publish() {
        let p = MqttPublish::desired_state("kettle-1", PowerState::On);
        assert_eq!(p.topic, "/kettle-1/desired");
        assert_eq!(p.payload, b"ON");
        assert!(!p.retain);
        assert_eq!(p.qos, QoS::AtMostOnce);

        let p = MqttPublish::desired_state("kettle-1", PowerState::Off);
        assert_eq!(p.payload, b"OFF");
    }

    #[test]
    fn test_actual_path() {
        assert_eq!(actual_path("abc123"), "/abc123/actual");
    }
}
