//! In-process message bus backed by tokio channels.
//!
//! Published messages fan out on a [`broadcast`] channel; messages delivered
//! on subscribed topics are queued on the [`mpsc`] channel the runtime reads.

use std::collections::HashSet;
use std::sync::Mutex;

use tokio::sync::{broadcast, mpsc};

use deliveryapp_domain::error::DeliveryError;

use crate::ports::{Message, MessageBus};

/// In-process message bus for embedding and tests.
///
/// Publishing succeeds even when nobody watches the outbound side
/// (the message is simply dropped), as with a broker without subscribers.
pub struct InProcessMessageBus {
    outbound: broadcast::Sender<Message>,
    inbound: mpsc::Sender<Message>,
    subscriptions: Mutex<HashSet<String>>,
}

impl InProcessMessageBus {
    /// Create a bus with the given channel capacity, returning the receiver
    /// of inbound messages.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (outbound, _) = broadcast::channel(capacity);
        let (inbound, receiver) = mpsc::channel(capacity);
        let bus = Self {
            outbound,
            inbound,
            subscriptions: Mutex::new(HashSet::new()),
        };
        (bus, receiver)
    }

    /// Watch every message published *after* this call.
    #[must_use]
    pub fn watch_published(&self) -> broadcast::Receiver<Message> {
        self.outbound.subscribe()
    }

    /// Whether some component subscribed to `topic`.
    #[must_use]
    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.lock_subscriptions().contains(topic)
    }

    /// Inject a message as if it arrived from a remote publisher.
    ///
    /// Returns `false` when nobody subscribed to `topic` or the inbound
    /// receiver is gone; the message is then discarded.
    pub async fn deliver(&self, topic: &str, payload: impl Into<Vec<u8>>) -> bool {
        if !self.is_subscribed(topic) {
            tracing::debug!(%topic, "no subscription, message discarded");
            return false;
        }
        self.inbound
            .send(Message::new(topic, payload))
            .await
            .is_ok()
    }

    fn lock_subscriptions(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl MessageBus for InProcessMessageBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), DeliveryError> {
        // Fails only when nobody watches the outbound side.
        let _ = self.outbound.send(Message::new(topic, payload));
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<(), DeliveryError> {
        self.lock_subscriptions().insert(topic.to_string());
        Ok(())
    }
}
