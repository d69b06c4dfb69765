use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wattsync_api::models::StatusUpdateEvent;

use crate::configs::settings::Gateway as GatewayConfig;
use crate::errors::GatewayError;

/// Push-subscription lifecycle. The eventloop task walks
/// Connecting → Connected → Disconnected and back on its own;
/// observers read the current phase from a watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// What the gateway feeds into the engine loop.
#[derive(Debug)]
pub enum GatewayMessage {
    /// One decoded push event, in arrival order.
    Status(StatusUpdateEvent),
    /// The subscription came back after a gap. Events from before the
    /// gap are not trustworthy, the engine must re-fetch a snapshot.
    Reconnected,
}

/// Long-lived MQTT subscription to the per-user status topic.
pub struct PushGateway {
    client: AsyncClient,
    state_rx: watch::Receiver<ConnectionState>,
    task: JoinHandle<()>,
}

impl PushGateway {
    /// Connects to the broker and pumps decoded events into `tx` until
    /// shut down. Credentials are the username plus the bearer token.
    pub fn connect(
        config: &GatewayConfig,
        username: &str,
        token: &str,
        tx: mpsc::Sender<GatewayMessage>,
    ) -> Self {
        let client_id = format!("{}-{}", config.client_id, Uuid::new_v4());
        let mut options = MqttOptions::new(client_id, &config.host, config.port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));
        options.set_credentials(username, token);

        let (client, eventloop) = AsyncClient::new(options, 100);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);

        let topic = format!("{}/{}/status", config.topic_prefix, username);
        let reconnect_delay = Duration::from_secs(config.reconnect_delay_secs);
        let task = tokio::spawn(run_event_loop(
            eventloop,
            client.clone(),
            topic,
            tx,
            state_tx,
            reconnect_delay,
        ));

        Self {
            client,
            state_rx,
            task,
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Tears the subscription down. Called together with the engine
    /// shutdown so no socket outlives the dashboard.
    pub async fn shutdown(self) -> Result<(), GatewayError> {
        let result = self.client.disconnect().await;
        self.task.abort();
        result.map_err(GatewayError::from)
    }
}

fn decode_event(payload: &[u8]) -> Result<StatusUpdateEvent, GatewayError> {
    Ok(serde_json::from_slice(payload)?)
}

async fn run_event_loop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    topic: String,
    tx: mpsc::Sender<GatewayMessage>,
    state_tx: watch::Sender<ConnectionState>,
    reconnect_delay: Duration,
) {
    let mut ever_connected = false;

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!(topic = %topic, "gateway connected");
                state_tx.send_replace(ConnectionState::Connected);

                if let Err(e) = client.subscribe(&topic, QoS::AtLeastOnce).await {
                    warn!("subscribe failed: {e}");
                }

                if ever_connected && tx.send(GatewayMessage::Reconnected).await.is_err() {
                    break;
                }
                ever_connected = true;
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => match decode_event(&publish.payload) {
                Ok(event) => {
                    if tx.send(GatewayMessage::Status(event)).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(topic = %publish.topic, "dropping malformed push payload: {e}"),
            },
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "gateway connection lost: {e}; retrying in {}s",
                    reconnect_delay.as_secs()
                );
                state_tx.send_replace(ConnectionState::Disconnected);
                tokio::time::sleep(reconnect_delay).await;
                state_tx.send_replace(ConnectionState::Connecting);
            }
        }
    }

    debug!("gateway event loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_event_accepts_wire_payload() {
        let event =
            decode_event(br#"{"deviceId": 3, "username": "olena", "isOnline": true}"#).unwrap();
        assert_eq!(event.device_id, 3);
        assert_eq!(event.is_online, Some(true));
    }

    #[test]
    fn test_decode_event_rejects_garbage() {
        assert!(decode_event(b"not json").is_err());
        assert!(decode_event(br#"{"isOnline": true}"#).is_err(), "deviceId is required");
    }
}
