//! State notifier: mirrors the trunk open/closed signal onto a topic.

use tokio::task::JoinHandle;

use deliveryapp_domain::error::{DeliveryError, report};
use deliveryapp_domain::message::TrunkStateNotification;
use deliveryapp_domain::signal::{SignalPath, SignalUpdate};
use deliveryapp_domain::topic;
use deliveryapp_domain::trunk::TrunkPosition;

use crate::ports::{MessageBus, SignalClient, SignalStream};

/// Republishes every change of a trunk's `IsOpen` signal as
/// `{"isOpen": <bool>}` on [`topic::TRUNK_STATE`].
pub struct StateNotifier<B> {
    bus: B,
    is_open_path: SignalPath,
}

impl<B: MessageBus + 'static> StateNotifier<B> {
    /// Create a notifier for the trunk at `position`.
    pub fn new(bus: B, position: TrunkPosition) -> Self {
        Self {
            bus,
            is_open_path: position.is_open_path(),
        }
    }

    /// Publish the trunk state carried by one update.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Signal`] if the update has no boolean entry
    /// for the subscribed path, or the bus error if publishing fails.
    pub async fn on_signal_changed(&self, update: &SignalUpdate) -> Result<(), DeliveryError> {
        let is_open = update.bool_value(&self.is_open_path)?;
        let payload = TrunkStateNotification { is_open }.to_payload()?;
        self.bus.publish(topic::TRUNK_STATE, payload).await?;
        tracing::debug!(is_open, "trunk state published");
        Ok(())
    }

    /// Subscribe to the trunk signal and forward updates in a background task.
    ///
    /// A failed subscription is logged and yields `None`; the rest of the
    /// application keeps running without trunk state notifications.
    pub async fn start<S: SignalClient>(self, signals: &S) -> Option<JoinHandle<()>> {
        match signals.subscribe(&self.is_open_path).await {
            Ok(stream) => {
                tracing::info!(path = %self.is_open_path, "subscribed to trunk state");
                Some(tokio::spawn(self.forward(stream)))
            }
            Err(err) => {
                tracing::error!(
                    path = %self.is_open_path,
                    error = %report(&err),
                    "trunk state subscription failed, notifications disabled"
                );
                None
            }
        }
    }

    async fn forward(self, mut stream: SignalStream) {
        while let Some(update) = stream.recv().await {
            if let Err(err) = self.on_signal_changed(&update).await {
                tracing::error!(error = %report(&err), "failed to mirror trunk state");
            }
        }
        tracing::debug!(path = %self.is_open_path, "trunk state stream ended");
    }
}
