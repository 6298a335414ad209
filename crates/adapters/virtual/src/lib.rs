//! # deliveryapp-adapter-virtual
//!
//! Virtual vehicle that stands in for the vehicle signal broker during
//! development and testing.
//!
//! ## Provided signals
//!
//! | Signal | Type | Behaviour |
//! |--------|------|-----------|
//! | `Vehicle.Body.Trunk.Front.IsOpen` | bool | Set by the front trunk actuator |
//! | `Vehicle.Body.Trunk.Rear.IsOpen` | bool | Set by the rear trunk actuator |
//!
//! Opening or closing a trunk waits for the configured actuation delay, then
//! writes the new `IsOpen` value. Subscribers are notified only when a value
//! actually changes.
//!
//! ## Dependency rule
//!
//! Depends on `deliveryapp-app` (port traits) and `deliveryapp-domain` only.

mod config;

pub use config::VirtualConfig;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use deliveryapp_app::ports::{SignalClient, SignalStream, TrunkService};
use deliveryapp_domain::error::{DeliveryError, SignalError};
use deliveryapp_domain::signal::{SignalPath, SignalUpdate, SignalValue};
use deliveryapp_domain::trunk::TrunkPosition;

struct Subscriber {
    path: SignalPath,
    sender: mpsc::Sender<SignalUpdate>,
}

/// Simulated signal broker and trunk actuator.
pub struct VirtualVehicle {
    signals: Mutex<HashMap<SignalPath, SignalValue>>,
    subscribers: Mutex<Vec<Subscriber>>,
    actuation_delay: Duration,
    subscription_capacity: usize,
}

impl Default for VirtualVehicle {
    fn default() -> Self {
        Self::new(&VirtualConfig::default())
    }
}

impl VirtualVehicle {
    #[must_use]
    pub fn new(config: &VirtualConfig) -> Self {
        let signals = [TrunkPosition::Front, TrunkPosition::Rear]
            .into_iter()
            .map(|position| {
                (
                    position.is_open_path(),
                    SignalValue::Bool(config.initial_trunk_open),
                )
            })
            .collect();

        Self {
            signals: Mutex::new(signals),
            subscribers: Mutex::new(Vec::new()),
            actuation_delay: Duration::from_millis(config.actuation_delay_ms),
            subscription_capacity: config.subscription_capacity.max(1),
        }
    }

    /// Write a signal value, notifying subscribers if it changed.
    ///
    /// Also used to simulate changes that happen outside the actuator
    /// (someone closing the trunk by hand).
    pub fn set_signal(&self, path: &SignalPath, value: SignalValue) {
        let previous = self.lock_signals().insert(path.clone(), value.clone());
        if previous.as_ref() == Some(&value) {
            return;
        }
        tracing::debug!(%path, ?value, "virtual signal changed");
        self.notify(path, &value);
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|s| !s.sender.is_closed());
        subscribers.len()
    }

    fn notify(&self, path: &SignalPath, value: &SignalValue) {
        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|subscriber| {
            if subscriber.path != *path {
                return !subscriber.sender.is_closed();
            }
            let update = SignalUpdate::single(path.clone(), value.clone());
            match subscriber.sender.try_send(update) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(%path, "subscriber lagging, update dropped");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
    }

    async fn actuate(&self, position: TrunkPosition, is_open: bool) {
        if !self.actuation_delay.is_zero() {
            tokio::time::sleep(self.actuation_delay).await;
        }
        self.set_signal(&position.is_open_path(), SignalValue::Bool(is_open));
    }

    fn lock_signals(&self) -> MutexGuard<'_, HashMap<SignalPath, SignalValue>> {
        self.signals.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl SignalClient for VirtualVehicle {
    async fn get(&self, path: &SignalPath) -> Result<SignalValue, DeliveryError> {
        let value = self.lock_signals().get(path).cloned();
        value.ok_or_else(|| SignalError::NotFound(path.clone()).into())
    }

    async fn subscribe(&self, path: &SignalPath) -> Result<SignalStream, DeliveryError> {
        if !self.lock_signals().contains_key(path) {
            return Err(SignalError::NotFound(path.clone()).into());
        }
        let (sender, receiver) = mpsc::channel(self.subscription_capacity);
        self.lock_subscribers().push(Subscriber {
            path: path.clone(),
            sender,
        });
        tracing::debug!(%path, "virtual subscription added");
        Ok(receiver)
    }
}

impl TrunkService for VirtualVehicle {
    async fn open(&self, position: TrunkPosition) -> Result<(), DeliveryError> {
        tracing::info!(%position, "virtual trunk opening");
        self.actuate(position, true).await;
        Ok(())
    }

    async fn close(&self, position: TrunkPosition) -> Result<(), DeliveryError> {
        tracing::info!(%position, "virtual trunk closing");
        self.actuate(position, false).await;
        Ok(())
    }
}
