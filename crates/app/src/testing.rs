//! In-memory port implementations shared by the unit tests of this crate.

use std::sync::Mutex;

use tokio::sync::mpsc;

use deliveryapp_domain::error::DeliveryError;
use deliveryapp_domain::signal::{SignalPath, SignalUpdate, SignalValue};
use deliveryapp_domain::trunk::{TrunkCommand, TrunkPosition};

use crate::ports::{Message, MessageBus, SignalClient, SignalStream, TrunkService};

fn unavailable(what: &str) -> DeliveryError {
    DeliveryError::transport(std::io::Error::other(format!("{what} unavailable")))
}

// ── Fake vehicle ───────────────────────────────────────────────

/// Fake signal broker + trunk actuator.
///
/// Opening or closing the trunk updates the `IsOpen` value immediately, the
/// way the physical actuator eventually would.
pub struct FakeVehicle {
    is_open: Mutex<Option<SignalValue>>,
    pub calls: Mutex<Vec<(TrunkCommand, TrunkPosition)>>,
    pub subscribed: Mutex<Vec<SignalPath>>,
    pub fail_get: bool,
    pub fail_invoke: bool,
    pub fail_subscribe: bool,
    /// Suspend between reading the value and returning it.
    pub yield_after_read: bool,
    stream: Mutex<Option<SignalStream>>,
}

impl FakeVehicle {
    pub fn with_trunk_open(is_open: bool) -> Self {
        Self {
            is_open: Mutex::new(Some(SignalValue::Bool(is_open))),
            calls: Mutex::new(Vec::new()),
            subscribed: Mutex::new(Vec::new()),
            fail_get: false,
            fail_invoke: false,
            fail_subscribe: false,
            yield_after_read: false,
            stream: Mutex::new(None),
        }
    }

    pub fn with_value(value: Option<SignalValue>) -> Self {
        let vehicle = Self::with_trunk_open(false);
        *vehicle.is_open.lock().unwrap() = value;
        vehicle
    }

    /// Hand out `stream` on the next successful `subscribe`.
    pub fn with_stream(self, stream: SignalStream) -> Self {
        *self.stream.lock().unwrap() = Some(stream);
        self
    }

    pub fn commands(&self) -> Vec<TrunkCommand> {
        self.calls.lock().unwrap().iter().map(|(c, _)| *c).collect()
    }
}

impl SignalClient for FakeVehicle {
    async fn get(&self, path: &SignalPath) -> Result<SignalValue, DeliveryError> {
        if self.fail_get {
            return Err(unavailable("databroker"));
        }
        let value = self.is_open.lock().unwrap().clone();
        if self.yield_after_read {
            tokio::task::yield_now().await;
        }
        value.ok_or_else(|| {
            deliveryapp_domain::error::SignalError::NotFound(path.clone()).into()
        })
    }

    async fn subscribe(&self, path: &SignalPath) -> Result<SignalStream, DeliveryError> {
        if self.fail_subscribe {
            return Err(unavailable("databroker"));
        }
        self.subscribed.lock().unwrap().push(path.clone());
        let stream = self.stream.lock().unwrap().take();
        Ok(stream.unwrap_or_else(|| mpsc::channel::<SignalUpdate>(1).1))
    }
}

impl TrunkService for FakeVehicle {
    async fn open(&self, position: TrunkPosition) -> Result<(), DeliveryError> {
        if self.fail_invoke {
            return Err(unavailable("trunk service"));
        }
        self.calls
            .lock()
            .unwrap()
            .push((TrunkCommand::Open, position));
        *self.is_open.lock().unwrap() = Some(SignalValue::Bool(true));
        Ok(())
    }

    async fn close(&self, position: TrunkPosition) -> Result<(), DeliveryError> {
        if self.fail_invoke {
            return Err(unavailable("trunk service"));
        }
        self.calls
            .lock()
            .unwrap()
            .push((TrunkCommand::Close, position));
        *self.is_open.lock().unwrap() = Some(SignalValue::Bool(false));
        Ok(())
    }
}

// ── Recording bus ──────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingBus {
    pub published: Mutex<Vec<Message>>,
    pub subscribed: Mutex<Vec<String>>,
    pub fail_publish: bool,
    pub fail_subscribe: bool,
}

impl RecordingBus {
    pub fn published_on(&self, topic: &str) -> Vec<serde_json::Value> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.topic == topic)
            .map(|m| serde_json::from_slice(&m.payload).unwrap())
            .collect()
    }
}

impl MessageBus for RecordingBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), DeliveryError> {
        if self.fail_publish {
            return Err(unavailable("broker"));
        }
        self.published
            .lock()
            .unwrap()
            .push(Message::new(topic, payload));
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<(), DeliveryError> {
        if self.fail_subscribe {
            return Err(unavailable("broker"));
        }
        self.subscribed.lock().unwrap().push(topic.to_string());
        Ok(())
    }
}
