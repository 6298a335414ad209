//! MQTT connection configuration.

use serde::Deserialize;

/// Configuration for the MQTT connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Quality of service for publications and subscriptions (0, 1 or 2).
    pub qos: u8,
    /// Pause between reconnection attempts, in seconds.
    pub reconnect_delay_secs: u64,
    /// Capacity of the request and inbound message channels.
    pub channel_capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "deliveryapp".to_string(),
            keep_alive_secs: 30,
            qos: 0,
            reconnect_delay_secs: 5,
            channel_capacity: 64,
        }
    }
}
