// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};

use crate::error::ProtocolError;
use crate::protocol::Publisher;

/// Delay before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Capacity of the inbound telemetry channel.
const INBOUND_CAPACITY: usize = 32;

/// Capacity of the outgoing request queue.
const REQUEST_CAPACITY: usize = 10;

/// Connection parameters for the MQTT broker.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use beca_climate::protocol::MqttConfig;
///
/// let config = MqttConfig::new("mqtt://192.168.1.50:1883")
///     .with_credentials("mqtt_user", "mqtt_password")
///     .with_keep_alive(Duration::from_secs(60));
///
/// assert_eq!(config.broker_url(), "mqtt://192.168.1.50:1883");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MqttConfig {
    broker_url: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default = "default_keep_alive_secs")]
    keep_alive_secs: u64,
}

fn default_keep_alive_secs() -> u64 {
    30
}

impl MqttConfig {
    /// Creates a configuration for the given broker URL.
    ///
    /// Accepted forms: `mqtt://host:port`, `tcp://host:port`, `host:port`
    /// and `host` (port 1883).
    #[must_use]
    pub fn new(broker_url: impl Into<String>) -> Self {
        Self {
            broker_url: broker_url.into(),
            username: None,
            password: None,
            client_id: None,
            keep_alive_secs: default_keep_alive_secs(),
        }
    }

    /// Sets authentication credentials for the broker.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets a fixed client ID.
    #[must_use]
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Sets the keep-alive interval.
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive_secs = keep_alive.as_secs();
        self
    }

    /// Returns the broker URL.
    #[must_use]
    pub fn broker_url(&self) -> &str {
        &self.broker_url
    }

    /// Returns the keep-alive interval.
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    fn to_options(&self) -> Result<MqttOptions, ProtocolError> {
        let (host, port) = parse_mqtt_url(&self.broker_url)?;

        let client_id = self
            .client_id
            .clone()
            .unwrap_or_else(|| format!("beca_{}", uuid::Uuid::new_v4().simple()));

        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(self.keep_alive());
        options.set_clean_session(true);

        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            options.set_credentials(username, password);
        }

        Ok(options)
    }
}

/// A message received on a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Topic the message arrived on.
    pub topic: String,
    /// UTF-8 payload (invalid sequences replaced).
    pub payload: String,
}

impl AsRef<str> for InboundMessage {
    fn as_ref(&self) -> &str {
        &self.payload
    }
}

/// MQTT client publishing commands and forwarding telemetry.
///
/// The event loop runs in a background task. Subscriptions are (re)issued on
/// every connection acknowledgement, so they survive broker reconnects.
/// While the broker is unreachable, publishes queue up to the request
/// capacity and then wait for the connection to come back.
///
/// # Examples
///
/// ```ignore
/// use beca_climate::protocol::{MqttClient, MqttConfig};
///
/// let config = MqttConfig::new("mqtt://192.168.1.50:1883");
/// let (client, mut inbound) =
///     MqttClient::connect(&config, vec!["beca/tele/RESULT".to_string()])?;
///
/// while let Some(message) = inbound.recv().await {
///     println!("{}: {}", message.topic, message.payload);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MqttClient {
    client: AsyncClient,
    lifecycle: Arc<Lifecycle>,
}

/// Shared by every clone of a client. Dropping the last clone drops the
/// shutdown sender, which stops the event loop.
#[derive(Debug)]
struct Lifecycle {
    disconnecting: Arc<AtomicBool>,
    _shutdown: oneshot::Sender<()>,
}

impl MqttClient {
    /// Starts a connection to the broker and subscribes to the given topics.
    ///
    /// Returns immediately; the connection is established by the background
    /// task and retried every few seconds until the broker answers.
    ///
    /// The inbound receiver closes when the event loop stops: after
    /// [`disconnect`](MqttClient::disconnect), or once the client and all its
    /// clones are dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the broker URL is invalid.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn connect(
        config: &MqttConfig,
        subscriptions: Vec<String>,
    ) -> Result<(Self, mpsc::Receiver<InboundMessage>), ProtocolError> {
        let options = config.to_options()?;
        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let disconnecting = Arc::new(AtomicBool::new(false));

        let events = EventLoopTask {
            event_loop,
            client: client.clone(),
            subscriptions,
            inbound_tx,
            disconnecting: Arc::clone(&disconnecting),
            shutdown: shutdown_rx,
        };
        tokio::spawn(events.run());

        let lifecycle = Arc::new(Lifecycle {
            disconnecting,
            _shutdown: shutdown_tx,
        });
        Ok((Self { client, lifecycle }, inbound_rx))
    }

    /// Disconnects from the broker and stops the event loop.
    ///
    /// The loop is not restarted; publishes made afterwards fail.
    pub async fn disconnect(&self) {
        self.lifecycle.disconnecting.store(true, Ordering::Release);
        if let Err(e) = self.client.disconnect().await {
            tracing::debug!(error = %e, "MQTT event loop already stopped");
        }
    }
}

impl Publisher for MqttClient {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), ProtocolError> {
        tracing::debug!(topic = %topic, payload = %payload, "Publishing MQTT command");

        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload.as_bytes().to_vec())
            .await
            .map_err(ProtocolError::Mqtt)
    }
}

/// Parses an MQTT URL into host and port.
fn parse_mqtt_url(url: &str) -> Result<(String, u16), ProtocolError> {
    let url = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    if url.is_empty() {
        return Err(ProtocolError::InvalidAddress("empty broker host".to_string()));
    }

    let (host, port) = if let Some((h, p)) = url.rsplit_once(':') {
        let port = p
            .parse()
            .map_err(|_| ProtocolError::InvalidAddress(format!("Invalid port: {p}")))?;
        (h.to_string(), port)
    } else {
        (url.to_string(), 1883)
    };

    Ok((host, port))
}

/// Background task driving the rumqttc event loop.
struct EventLoopTask {
    event_loop: EventLoop,
    client: AsyncClient,
    subscriptions: Vec<String>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    disconnecting: Arc<AtomicBool>,
    shutdown: oneshot::Receiver<()>,
}

impl EventLoopTask {
    /// Polls until the client is dropped or disconnected.
    ///
    /// Nothing in here awaits the request channel: only `poll` drains it, so
    /// a full queue would otherwise stall the loop for good.
    async fn run(mut self) {
        loop {
            let event = tokio::select! {
                _ = &mut self.shutdown => {
                    tracing::debug!("MQTT client dropped, stopping event loop");
                    break;
                }
                event = self.event_loop.poll() => event,
            };

            match event {
                Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                    tracing::debug!(?connack, "MQTT connected");
                    self.spawn_subscribe();
                }
                Ok(Event::Incoming(Packet::SubAck(suback))) => {
                    tracing::debug!(?suback, "MQTT subscription acknowledged");
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    if !self.subscriptions.iter().any(|t| *t == publish.topic) {
                        continue;
                    }
                    let payload = String::from_utf8_lossy(&publish.payload).to_string();
                    tracing::debug!(topic = %publish.topic, payload = %payload, "Received MQTT message");
                    self.forward(InboundMessage {
                        topic: publish.topic,
                        payload,
                    });
                }
                Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                    tracing::debug!("MQTT disconnect sent, stopping event loop");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    if self.disconnecting.load(Ordering::Acquire) {
                        tracing::debug!(error = %e, "MQTT connection closed after disconnect");
                        break;
                    }
                    tracing::error!(error = %e, "MQTT event loop error, reconnecting");
                    tokio::select! {
                        _ = &mut self.shutdown => break,
                        () = tokio::time::sleep(RECONNECT_DELAY) => {}
                    }
                }
            }
        }
    }

    /// Issues the subscriptions from a separate task.
    fn spawn_subscribe(&self) {
        if self.subscriptions.is_empty() {
            return;
        }
        let client = self.client.clone();
        let topics = self.subscriptions.clone();
        tokio::spawn(async move {
            for topic in topics {
                if let Err(e) = client.subscribe(&topic, QoS::AtLeastOnce).await {
                    tracing::error!(topic = %topic, error = %e, "MQTT subscribe failed");
                }
            }
        });
    }

    /// Hands a message to the receiver without blocking the loop.
    fn forward(&self, message: InboundMessage) {
        match self.inbound_tx.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(message)) => {
                tracing::warn!(topic = %message.topic, "Inbound channel full, dropping message");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("Inbound receiver dropped, message discarded");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mqtt_url_with_port() {
        let (host, port) = parse_mqtt_url("mqtt://192.168.1.50:1883").unwrap();
        assert_eq!(host, "192.168.1.50");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_mqtt_url_default_port() {
        let (host, port) = parse_mqtt_url("192.168.1.50").unwrap();
        assert_eq!(host, "192.168.1.50");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_mqtt_url_tcp_scheme() {
        let (host, port) = parse_mqtt_url("tcp://broker.local:8883").unwrap();
        assert_eq!(host, "broker.local");
        assert_eq!(port, 8883);
    }

    #[test]
    fn parse_mqtt_url_invalid_port() {
        assert!(matches!(
            parse_mqtt_url("mqtt://broker:abc"),
            Err(ProtocolError::InvalidAddress(_))
        ));
    }

    #[test]
    fn parse_mqtt_url_empty() {
        assert!(parse_mqtt_url("mqtt://").is_err());
    }

    #[test]
    fn config_defaults() {
        let config = MqttConfig::new("broker");
        assert_eq!(config.keep_alive(), Duration::from_secs(30));
        assert!(config.username.is_none());
        assert!(config.client_id.is_none());
    }

    #[test]
    fn config_from_json() {
        let config: MqttConfig = serde_json::from_str(
            r#"{"broker_url":"mqtt://broker:1883","username":"u","password":"p","keep_alive_secs":10}"#,
        )
        .unwrap();
        assert_eq!(config.broker_url(), "mqtt://broker:1883");
        assert_eq!(config.username.as_deref(), Some("u"));
        assert_eq!(config.keep_alive(), Duration::from_secs(10));
    }

    #[test]
    fn generated_client_ids_are_unique() {
        let config = MqttConfig::new("broker");
        let a = config.to_options().unwrap();
        let b = config.to_options().unwrap();
        assert_ne!(a.client_id(), b.client_id());
    }

    #[test]
    fn fixed_client_id_is_used() {
        let config = MqttConfig::new("broker").with_client_id("thermostat_bridge");
        assert_eq!(config.to_options().unwrap().client_id(), "thermostat_bridge");
    }
}
