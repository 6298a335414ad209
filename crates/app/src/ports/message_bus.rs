//! Message bus port: publish/subscribe over named topics.

use std::future::Future;
use std::sync::Arc;

use deliveryapp_domain::error::DeliveryError;

/// A payload travelling on a topic, in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Outbound side of the messaging transport.
///
/// Inbound messages for subscribed topics are delivered by the adapter on a
/// channel handed to the runtime when the adapter is constructed.
pub trait MessageBus: Send + Sync {
    /// Publish `payload` on `topic`.
    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;

    /// Start receiving messages published on `topic`.
    fn subscribe(&self, topic: &str) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

impl<T: MessageBus> MessageBus for Arc<T> {
    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (**self).publish(topic, payload)
    }

    fn subscribe(&self, topic: &str) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (**self).subscribe(topic)
    }
}
