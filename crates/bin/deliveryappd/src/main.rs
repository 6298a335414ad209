//! # deliveryappd: delivery app daemon
//!
//! Composition root that wires the adapters together and runs the delivery
//! app until terminated.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Construct the virtual vehicle and the MQTT bus (adapters)
//! - Construct the command dispatcher and state notifier, injecting adapters
//!   via port traits
//! - Register handlers and run the application runtime
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use deliveryapp_adapter_mqtt::MqttConnection;
use deliveryapp_adapter_virtual::VirtualVehicle;
use deliveryapp_app::runtime::{AppRuntime, TopicRegistry};
use deliveryapp_app::services::{CommandDispatcher, StateNotifier};
use deliveryapp_domain::error::report;
use deliveryapp_domain::topic;

use crate::config::Config;

const DISCONNECT_GRACE: Duration = Duration::from_secs(2);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging.filter);

    tracing::info!(
        broker = %config.broker_addr(),
        trunk = %config.vehicle.trunk,
        exclusive_toggles = config.dispatcher.exclusive_toggles,
        "deliveryappd starting"
    );

    run(config).await
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), falling back to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: Config) -> anyhow::Result<()> {
    let position = config.vehicle.trunk;

    // Adapters
    let vehicle = Arc::new(VirtualVehicle::new(&config.vehicle.simulator()));
    let MqttConnection {
        bus,
        inbound,
        mut event_loop,
    } = deliveryapp_adapter_mqtt::connect(&config.mqtt).context("failed to set up MQTT client")?;
    let bus = Arc::new(bus);

    // Services
    let mut dispatcher = CommandDispatcher::new(
        Arc::clone(&vehicle),
        Arc::clone(&vehicle),
        Arc::clone(&bus),
        position,
    );
    if config.dispatcher.exclusive_toggles {
        dispatcher = dispatcher.with_exclusive_toggles();
    }
    let dispatcher = Arc::new(dispatcher);
    let notifier = StateNotifier::new(Arc::clone(&bus), position);

    // Runtime
    let mut registry = TopicRegistry::new();
    registry.register(topic::OPEN_TRUNK_REQUEST, move |payload: Vec<u8>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { dispatcher.handle_open_trunk_request(&payload).await }
    });

    let mut runtime = AppRuntime::new(Arc::clone(&bus), registry);
    let signals = Arc::clone(&vehicle);
    runtime.on_start(move || async move { notifier.start(&signals).await });

    runtime.run(inbound, shutdown_signal()).await;

    if let Err(err) = bus.disconnect().await {
        tracing::warn!(error = %report(&err), "MQTT disconnect failed");
    }
    if tokio::time::timeout(DISCONNECT_GRACE, &mut event_loop)
        .await
        .is_err()
    {
        tracing::warn!("MQTT event loop did not stop in time, aborting");
        event_loop.abort();
    }

    tracing::info!("deliveryappd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("ctrl-c received"),
        () = terminate => tracing::info!("SIGTERM received"),
    }
}
