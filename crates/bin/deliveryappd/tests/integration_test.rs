//! End-to-end tests for the full deliveryappd stack.
//!
//! Each test runs the real runtime, dispatcher, notifier and virtual vehicle
//! over the in-process message bus. No broker is contacted.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::{broadcast, oneshot, watch};
use tokio::task::JoinHandle;

use deliveryapp_adapter_virtual::{VirtualConfig, VirtualVehicle};
use deliveryapp_app::message_bus::InProcessMessageBus;
use deliveryapp_app::ports::{Message, SignalClient};
use deliveryapp_app::runtime::{AppRuntime, RuntimeState, TopicRegistry};
use deliveryapp_app::services::{CommandDispatcher, StateNotifier};
use deliveryapp_domain::signal::SignalValue;
use deliveryapp_domain::topic;
use deliveryapp_domain::trunk::TrunkPosition;

struct Harness {
    bus: Arc<InProcessMessageBus>,
    vehicle: Arc<VirtualVehicle>,
    published: broadcast::Receiver<Message>,
    state: watch::Receiver<RuntimeState>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Harness {
    /// Wire the application exactly as the daemon does, then wait for Running.
    async fn start(config: &VirtualConfig) -> Self {
        let (bus, inbound) = InProcessMessageBus::new(64);
        let bus = Arc::new(bus);
        let vehicle = Arc::new(VirtualVehicle::new(config));
        let published = bus.watch_published();

        let dispatcher = Arc::new(CommandDispatcher::new(
            Arc::clone(&vehicle),
            Arc::clone(&vehicle),
            Arc::clone(&bus),
            TrunkPosition::Rear,
        ));
        let mut registry = TopicRegistry::new();
        registry.register(topic::OPEN_TRUNK_REQUEST, move |payload: Vec<u8>| {
            let dispatcher = Arc::clone(&dispatcher);
            async move { dispatcher.handle_open_trunk_request(&payload).await }
        });

        let mut runtime = AppRuntime::new(Arc::clone(&bus), registry);
        let notifier = StateNotifier::new(Arc::clone(&bus), TrunkPosition::Rear);
        let signals = Arc::clone(&vehicle);
        runtime.on_start(move || async move { notifier.start(&signals).await });

        let mut state = runtime.state();
        let (stop, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(runtime.run(inbound, async {
            let _ = stop_rx.await;
        }));
        state
            .wait_for(|s| *s == RuntimeState::Running)
            .await
            .expect("runtime should reach Running");

        Self {
            bus,
            vehicle,
            published,
            state,
            stop,
            task,
        }
    }

    async fn request(&self, payload: &str) {
        assert!(
            self.bus
                .deliver(topic::OPEN_TRUNK_REQUEST, payload.as_bytes())
                .await,
            "request topic should be subscribed"
        );
    }

    /// Next message published on `wanted`, skipping other topics.
    async fn next_on(&mut self, wanted: &str) -> Value {
        loop {
            let message = tokio::time::timeout(Duration::from_secs(1), self.published.recv())
                .await
                .expect("a message should be published")
                .expect("bus should stay open");
            if message.topic == wanted {
                return serde_json::from_slice(&message.payload).unwrap();
            }
        }
    }

    async fn stop(self) -> RuntimeState {
        self.stop.send(()).unwrap();
        self.task.await.unwrap();
        *self.state.borrow()
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_open_closed_trunk_and_confirm() {
    let mut app = Harness::start(&VirtualConfig::default()).await;

    app.request(r#"{"requestId":"abc-1"}"#).await;

    assert_eq!(
        app.next_on(topic::OPEN_TRUNK_RESPONSE).await,
        json!({"requestId": "abc-1", "result": {"status": 0, "message": "Trunk will now open"}})
    );
    assert_eq!(
        app.vehicle
            .get(&TrunkPosition::Rear.is_open_path())
            .await
            .unwrap(),
        SignalValue::Bool(true)
    );
    assert_eq!(app.stop().await, RuntimeState::Stopped);
}

#[tokio::test]
async fn should_close_open_trunk_and_confirm() {
    let mut app = Harness::start(&VirtualConfig {
        initial_trunk_open: true,
        ..VirtualConfig::default()
    })
    .await;

    app.request(r#"{"requestId":"r-9","note":"ignored"}"#).await;

    assert_eq!(
        app.next_on(topic::OPEN_TRUNK_RESPONSE).await,
        json!({"requestId": "r-9", "result": {"status": 0, "message": "Trunk will now close"}})
    );
    app.stop().await;
}

#[tokio::test]
async fn should_alternate_direction_on_sequential_requests() {
    let mut app = Harness::start(&VirtualConfig::default()).await;

    app.request(r#"{"requestId":"1"}"#).await;
    let first = app.next_on(topic::OPEN_TRUNK_RESPONSE).await;
    app.request(r#"{"requestId":"2"}"#).await;
    let second = app.next_on(topic::OPEN_TRUNK_RESPONSE).await;

    assert_eq!(first["result"]["message"], "Trunk will now open");
    assert_eq!(second["requestId"], "2");
    assert_eq!(second["result"]["message"], "Trunk will now close");
    app.stop().await;
}

#[tokio::test]
async fn should_publish_trunk_state_after_toggle() {
    let mut app = Harness::start(&VirtualConfig::default()).await;

    app.request(r#"{"requestId":"abc-1"}"#).await;

    assert_eq!(
        app.next_on(topic::TRUNK_STATE).await,
        json!({"isOpen": true})
    );
    app.stop().await;
}

#[tokio::test]
async fn should_publish_trunk_state_on_external_change() {
    let mut app = Harness::start(&VirtualConfig {
        initial_trunk_open: true,
        ..VirtualConfig::default()
    })
    .await;

    app.vehicle.set_signal(
        &TrunkPosition::Rear.is_open_path(),
        SignalValue::Bool(false),
    );

    assert_eq!(
        app.next_on(topic::TRUNK_STATE).await,
        json!({"isOpen": false})
    );
    app.stop().await;
}

#[tokio::test]
async fn should_reject_salvageable_request_with_failure_response() {
    let mut app = Harness::start(&VirtualConfig::default()).await;

    app.request(r#"{"requestId":42}"#).await;

    let response = app.next_on(topic::OPEN_TRUNK_RESPONSE).await;
    assert_eq!(response["requestId"], "42");
    assert_eq!(response["result"]["status"], 1);
    assert!(!response["result"]["message"].as_str().unwrap().is_empty());
    app.stop().await;
}

#[tokio::test]
async fn should_publish_nothing_for_non_json_payload() {
    let mut app = Harness::start(&VirtualConfig::default()).await;

    app.request("definitely not json").await;
    app.request(r#"{"requestId":"after"}"#).await;

    // The first response seen belongs to the follow-up request.
    let response = app.next_on(topic::OPEN_TRUNK_RESPONSE).await;
    assert_eq!(response["requestId"], "after");
    assert_eq!(response["result"]["status"], 0);
    app.stop().await;
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_stop_cleanly_without_traffic() {
    let app = Harness::start(&VirtualConfig::default()).await;
    assert_eq!(app.stop().await, RuntimeState::Stopped);
}
