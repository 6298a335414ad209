//! MQTT adapter error types.

use deliveryapp_domain::error::DeliveryError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error (request queue closed or full).
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// The configured quality of service is not 0, 1 or 2.
    #[error("invalid MQTT QoS {0}")]
    InvalidQos(u8),
}

impl MqttError {
    /// Convert into a [`DeliveryError::Transport`] for propagation across
    /// port boundaries.
    pub fn into_domain(self) -> DeliveryError {
        DeliveryError::transport(self)
    }
}

impl From<MqttError> for DeliveryError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

impl From<rumqttc::ClientError> for MqttError {
    fn from(err: rumqttc::ClientError) -> Self {
        Self::Client(err)
    }
}
