//! # deliveryapp-adapter-mqtt
//!
//! MQTT adapter: connects the delivery app to an MQTT broker.
//!
//! ## Responsibilities
//! - Connect to the broker and keep the connection alive
//! - Publish responses and trunk state notifications
//! - Subscribe to request topics and forward incoming publications to the
//!   runtime as [`Message`]s
//! - Re-subscribe every known topic after the broker connection is
//!   re-established
//!
//! ## Dependency rule
//! Depends on `deliveryapp-app` (port traits) and `deliveryapp-domain` only.

mod config;
mod error;

pub use config::MqttConfig;
pub use error::MqttError;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use deliveryapp_app::ports::{Message, MessageBus};
use deliveryapp_domain::error::DeliveryError;

/// Map a numeric quality of service onto the rumqttc level.
///
/// # Errors
///
/// Returns [`MqttError::InvalidQos`] for anything other than 0, 1 or 2.
pub fn qos(level: u8) -> Result<QoS, MqttError> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => Err(MqttError::InvalidQos(other)),
    }
}

fn options(config: &MqttConfig) -> MqttOptions {
    let mut options = MqttOptions::new(
        config.client_id.clone(),
        config.broker_host.clone(),
        config.broker_port,
    );
    options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
    options
}

type Subscriptions = Arc<Mutex<Vec<String>>>;

fn lock(subscriptions: &Subscriptions) -> MutexGuard<'_, Vec<String>> {
    subscriptions.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Outbound half of the MQTT connection.
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
    qos: QoS,
    subscriptions: Subscriptions,
}

impl MqttBus {
    /// Ask the broker to close the connection.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if the event loop is already gone.
    pub async fn disconnect(&self) -> Result<(), MqttError> {
        self.client.disconnect().await?;
        Ok(())
    }
}

impl MessageBus for MqttBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), DeliveryError> {
        let bytes = payload.len();
        self.client
            .publish(topic, self.qos, false, payload)
            .await
            .map_err(MqttError::from)?;
        tracing::debug!(%topic, bytes, "MQTT message queued");
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<(), DeliveryError> {
        {
            let mut subscriptions = lock(&self.subscriptions);
            if !subscriptions.iter().any(|known| known == topic) {
                subscriptions.push(topic.to_string());
            }
        }
        self.client
            .subscribe(topic, self.qos)
            .await
            .map_err(MqttError::from)?;
        tracing::info!(%topic, "MQTT subscription requested");
        Ok(())
    }
}

/// A live MQTT connection.
pub struct MqttConnection {
    /// Publishing and subscribing side, handed to the application.
    pub bus: MqttBus,
    /// Publications received on subscribed topics.
    pub inbound: mpsc::Receiver<Message>,
    /// Task polling the rumqttc event loop.
    pub event_loop: JoinHandle<()>,
}

/// Create the MQTT client and spawn the task that drives its event loop.
///
/// The connection itself is established lazily by the event loop; a broker
/// that is unreachable is retried every `reconnect_delay_secs`.
///
/// # Errors
///
/// Returns [`MqttError::InvalidQos`] if the configured QoS is out of range.
pub fn connect(config: &MqttConfig) -> Result<MqttConnection, MqttError> {
    let qos = qos(config.qos)?;
    let capacity = config.channel_capacity.max(1);
    let (client, event_loop) = AsyncClient::new(options(config), capacity);
    let (inbound_tx, inbound) = mpsc::channel(capacity);
    let subscriptions = Subscriptions::default();

    let bus = MqttBus {
        client: client.clone(),
        qos,
        subscriptions: Arc::clone(&subscriptions),
    };
    let driver = EventLoopDriver {
        event_loop,
        client,
        qos,
        subscriptions,
        inbound: inbound_tx,
        reconnect_delay: Duration::from_secs(config.reconnect_delay_secs),
    };

    tracing::info!(
        host = %config.broker_host,
        port = config.broker_port,
        client_id = %config.client_id,
        "connecting to MQTT broker"
    );

    Ok(MqttConnection {
        bus,
        inbound,
        event_loop: tokio::spawn(driver.run()),
    })
}

struct EventLoopDriver {
    event_loop: EventLoop,
    client: AsyncClient,
    qos: QoS,
    subscriptions: Subscriptions,
    inbound: mpsc::Sender<Message>,
    reconnect_delay: Duration,
}

impl EventLoopDriver {
    async fn run(mut self) {
        let mut connected_before = false;
        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let message = Message::new(publish.topic, publish.payload.to_vec());
                    if self.inbound.send(message).await.is_err() {
                        tracing::debug!("inbound receiver dropped, stopping MQTT event loop");
                        break;
                    }
                }
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    tracing::info!(code = ?ack.code, "connected to MQTT broker");
                    if connected_before {
                        self.resubscribe();
                    }
                    connected_before = true;
                }
                Ok(Event::Outgoing(rumqttc::Outgoing::Disconnect)) => {
                    tracing::info!("disconnecting from MQTT broker");
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        retry_in_secs = self.reconnect_delay.as_secs(),
                        "MQTT connection error"
                    );
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }

    // Runs inside the event loop task, so it must not wait on the request
    // channel that this same task drains.
    fn resubscribe(&self) {
        for topic in lock(&self.subscriptions).iter() {
            match self.client.try_subscribe(topic.as_str(), self.qos) {
                Ok(()) => tracing::debug!(%topic, "MQTT subscription restored"),
                Err(err) => {
                    tracing::warn!(%topic, error = %err, "failed to restore MQTT subscription");
                }
            }
        }
    }
}
