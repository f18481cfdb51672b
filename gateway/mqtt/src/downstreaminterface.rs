use std::time::Duration;

use abstractgateway::{BridgeError, PowerState, StateBridge};
use async_trait::async_trait;
use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, Incoming, MqttOptions, Outgoing};
use tracing::{debug, warn};

use crate::config::BrokerConfig;
use crate::models::types::{actual_path, MqttPublish};

/// State bridge backed by the hosted broker: MQTT for writes, the broker's
/// HTTP endpoint for reads.
pub struct MqttDownstream {
    cfg: BrokerConfig,
    http: reqwest::Client,
}

impl MqttDownstream {
    pub fn new(cfg: BrokerConfig) -> Self {
        Self {
            cfg,
            http: reqwest::Client::new(),
        }
    }
}

/// One broker connection, opened for a single publish. Dropping the session
/// drops the socket; [`BrokerSession::close`] disconnects cleanly.
struct BrokerSession {
    client: AsyncClient,
    eventloop: EventLoop,
}

impl BrokerSession {
    async fn open(cfg: &BrokerConfig) -> Result<Self, BridgeError> {
        let mut opts = MqttOptions::new(&cfg.client_id, &cfg.host, cfg.port);
        opts.set_keep_alive(Duration::from_secs(cfg.keep_alive_secs));
        opts.set_credentials(&cfg.key, &cfg.secret);

        let (client, mut eventloop) = AsyncClient::new(opts, 10);

        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                    debug!("connected to {}:{}", cfg.host, cfg.port);
                    return Ok(Self { client, eventloop });
                }
                Ok(_) => continue,
                Err(ConnectionError::ConnectionRefused(code)) => {
                    return Err(BridgeError::Connect(format!("refused by broker: {code:?}")));
                }
                Err(e) => return Err(BridgeError::Connect(e.to_string())),
            }
        }
    }

    /// Resolves once the publish packet has been written to the socket.
    async fn publish(&mut self, msg: MqttPublish) -> Result<(), BridgeError> {
        let topic = msg.topic.clone();
        self.client
            .publish(msg.topic, msg.qos, msg.retain, msg.payload)
            .await
            .map_err(|e| BridgeError::Publish(e.to_string()))?;

        loop {
            match self.eventloop.poll().await {
                Ok(Event::Outgoing(Outgoing::Publish(_))) => {
                    debug!("published to {topic}");
                    return Ok(());
                }
                Ok(_) => continue,
                Err(e) => return Err(BridgeError::Publish(e.to_string())),
            }
        }
    }

    async fn close(mut self) {
        if let Err(e) = self.client.disconnect().await {
            warn!("MQTT disconnect request failed: {e}");
            return;
        }
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                    debug!("disconnected");
                    return;
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!("MQTT disconnect failed: {e}");
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl StateBridge for MqttDownstream {
    async fn set_state(&self, device_id: &str, desired: PowerState) -> Result<(), BridgeError> {
        let mut session = BrokerSession::open(&self.cfg).await?;
        let published = session
            .publish(MqttPublish::desired_state(device_id, desired))
            .await;
        session.close().await;
        published
    }

    async fn get_state(&self, device_id: &str) -> Result<String, BridgeError> {
        let url = format!("{}{}", self.cfg.state_base_url(), actual_path(device_id));

        let res = self
            .http
            .get(&url)
            .basic_auth(&self.cfg.key, Some(&self.cfg.secret))
            .send()
            .await
            .map_err(|e| BridgeError::Read(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(BridgeError::Status {
                status: status.as_u16(),
            });
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| BridgeError::Read(e.to_string()))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;
    use wiremock::matchers::{basic_auth, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CONNACK_ACCEPTED: [u8; 4] = [0x20, 0x02, 0x00, 0x00];
    const CONNACK_NOT_AUTHORIZED: [u8; 4] = [0x20, 0x02, 0x00, 0x05];

    /// Read one MQTT control packet: first header byte and the packet body.
    /// `None` once the client has closed the socket.
    async fn read_packet(stream: &mut TcpStream) -> Option<(u8, Vec<u8>)> {
        let kind = stream.read_u8().await.ok()?;

        let mut len = 0usize;
        let mut shift = 0;
        loop {
            let b = stream.read_u8().await.ok()?;
            len |= ((b & 0x7f) as usize) << shift;
            if b & 0x80 == 0 {
                break;
            }
            shift += 7;
        }

        let mut body = vec![0u8; len];
        stream.read_exact(&mut body).await.ok()?;
        Some((kind, body))
    }

    async fn local_broker() -> (TcpListener, BrokerConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut cfg = BrokerConfig::new("127.0.0.1", "key", "secret");
        cfg.port = listener.local_addr().unwrap().port();
        (listener, cfg)
    }

    fn downstream(server: &MockServer) -> MqttDownstream {
        let mut cfg = BrokerConfig::new("broker.invalid", "key", "secret");
        cfg.state_url = Some(server.uri());
        MqttDownstream::new(cfg)
    }

    #[tokio::test]
    async fn test_get_state_reads_actual_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/kettle-1/actual"))
            .and(basic_auth("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ON"))
            .expect(1)
            .mount(&server)
            .await;

        let state = downstream(&server).get_state("kettle-1").await.unwrap();
        assert_eq!(state, "ON");
    }

    #[tokio::test]
    async fn test_get_state_does_not_validate_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/kettle-1/actual"))
            .respond_with(ResponseTemplate::new(200).set_body_string("warming up"))
            .mount(&server)
            .await;

        let state = downstream(&server).get_state("kettle-1").await.unwrap();
        assert_eq!(state, "warming up");
    }

    #[tokio::test]
    async fn test_get_state_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = downstream(&server).get_state("kettle-1").await.unwrap_err();
        assert!(matches!(err, BridgeError::Status { status: 401 }));
    }

    #[tokio::test]
    async fn test_set_state_propagates_connect_failure() {
        // Grab a free port, then close it so the connect is refused.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut cfg = BrokerConfig::new("127.0.0.1", "key", "secret");
        cfg.port = port;

        let err = MqttDownstream::new(cfg)
            .set_state("kettle-1", PowerState::On)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Connect(_)));
    }

    #[tokio::test]
    async fn test_set_state_publishes_once_then_disconnects() {
        let (listener, cfg) = local_broker().await;

        // Acknowledge the CONNECT, then record every packet until the client hangs up.
        let broker = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut packets = Vec::new();
            while let Some((kind, body)) = read_packet(&mut stream).await {
                if kind & 0xf0 == 0x10 {
                    stream.write_all(&CONNACK_ACCEPTED).await.unwrap();
                }
                packets.push((kind, body));
            }
            packets
        });

        MqttDownstream::new(cfg)
            .set_state("kettle-1", PowerState::On)
            .await
            .unwrap();

        let packets = broker.await.unwrap();
        let kinds: Vec<u8> = packets.iter().map(|(kind, _)| kind & 0xf0).collect();
        assert_eq!(kinds, vec![0x10, 0x30, 0xe0]);

        // CONNECT carries the client id and both credentials.
        let connect = &packets[0].1;
        let fields: [&[u8]; 3] = [b"Alexa", b"key", b"secret"];
        for field in fields {
            assert!(connect.windows(field.len()).any(|w| w == field));
        }

        // QoS 0, not retained: topic then body, no packet id.
        assert_eq!(packets[1].0, 0x30);
        let publish = &packets[1].1;
        let topic_len = u16::from_be_bytes([publish[0], publish[1]]) as usize;
        assert_eq!(&publish[2..2 + topic_len], b"/kettle-1/desired");
        assert_eq!(&publish[2 + topic_len..], b"ON");
    }

    #[tokio::test]
    async fn test_refused_connack_is_connect_error() {
        let (listener, cfg) = local_broker().await;

        let broker = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let (kind, _) = read_packet(&mut stream).await.unwrap();
            assert_eq!(kind & 0xf0, 0x10);
            stream.write_all(&CONNACK_NOT_AUTHORIZED).await.unwrap();
            // Drain until the client drops the socket.
            while read_packet(&mut stream).await.is_some() {}
        });

        let err = MqttDownstream::new(cfg)
            .set_state("kettle-1", PowerState::Off)
            .await
            .unwrap_err();
        match err {
            BridgeError::Connect(msg) => assert!(msg.contains("refused by broker"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
        broker.await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_fails_when_broker_drops_connection() {
        let (listener, cfg) = local_broker().await;
        let (connected_tx, connected_rx) = oneshot::channel::<()>();

        // Accept the session, then reset the socket once the client has seen the CONNACK.
        let broker = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_packet(&mut stream).await.unwrap();
            stream.write_all(&CONNACK_ACCEPTED).await.unwrap();
            connected_rx.await.unwrap();
            #[allow(deprecated)]
            stream.set_linger(Some(Duration::ZERO)).unwrap();
            drop(stream);
        });

        let mut session = BrokerSession::open(&cfg).await.unwrap();
        connected_tx.send(()).unwrap();
        broker.await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = session
            .publish(MqttPublish::desired_state("kettle-1", PowerState::On))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Publish(_)));
    }
}
