//! Application runtime: lifecycle coordinator.
//!
//! The runtime owns the [`TopicRegistry`], subscribes the bus to every
//! registered topic, runs one-shot startup hooks (such as the trunk state
//! subscription), then dispatches inbound messages until the shutdown future
//! resolves. Each message is handled in its own task, so handlers may
//! interleave at their suspension points; nothing here serialises them.
//!
//! On shutdown the inbound stream is closed and messages already queued on it
//! are still dispatched. In-flight handlers are then awaited, and background
//! tasks returned by startup hooks are aborted.

mod registry;
mod state;

pub use registry::{HandlerFuture, TopicHandler, TopicRegistry};
pub use state::RuntimeState;

use std::future::Future;
use std::pin::Pin;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};

use deliveryapp_domain::error::report;

use crate::ports::{Message, MessageBus};

type StartFuture = Pin<Box<dyn Future<Output = Option<JoinHandle<()>>> + Send>>;
type StartHook = Box<dyn FnOnce() -> StartFuture + Send>;

/// Process-wide lifecycle: `Created → Starting → Running → Stopping → Stopped`.
pub struct AppRuntime<B> {
    bus: B,
    registry: TopicRegistry,
    start_hooks: Vec<StartHook>,
    state: watch::Sender<RuntimeState>,
}

impl<B: MessageBus + 'static> AppRuntime<B> {
    /// Create a runtime in the [`Created`](RuntimeState::Created) state.
    pub fn new(bus: B, registry: TopicRegistry) -> Self {
        let (state, _) = watch::channel(RuntimeState::Created);
        Self {
            bus,
            registry,
            start_hooks: Vec::new(),
            state,
        }
    }

    /// Run `hook` once while starting.
    ///
    /// A hook returning `Some` hands over a background task that lives until
    /// shutdown. A hook returning `None` is assumed to have logged its own
    /// failure; startup continues either way and the hook is never retried.
    pub fn on_start<F, Fut>(&mut self, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Option<JoinHandle<()>>> + Send + 'static,
    {
        self.start_hooks
            .push(Box::new(move || -> StartFuture { Box::pin(hook()) }));
    }

    /// Observe lifecycle transitions.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<RuntimeState> {
        self.state.subscribe()
    }

    /// Start, dispatch `inbound` until `shutdown` resolves (or the inbound
    /// stream ends), then drain and stop.
    pub async fn run<F>(self, mut inbound: mpsc::Receiver<Message>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let Self {
            bus,
            registry,
            start_hooks,
            state,
        } = self;

        transition(&state, RuntimeState::Starting);

        for topic in registry.topics() {
            match bus.subscribe(topic).await {
                Ok(()) => tracing::debug!(%topic, "subscribed to topic"),
                Err(err) => {
                    tracing::error!(%topic, error = %report(&err), "topic subscription failed");
                }
            }
        }

        let mut background = Vec::new();
        for hook in start_hooks {
            background.extend(hook().await);
        }

        transition(&state, RuntimeState::Running);

        let mut in_flight = JoinSet::new();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!("termination requested");
                    break;
                }
                message = inbound.recv() => match message {
                    Some(message) => dispatch(&registry, message, &mut in_flight),
                    None => {
                        tracing::warn!("inbound message stream closed");
                        break;
                    }
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join(joined);
                }
            }
        }

        transition(&state, RuntimeState::Stopping);
        inbound.close();
        let mut queued = 0usize;
        while let Ok(message) = inbound.try_recv() {
            dispatch(&registry, message, &mut in_flight);
            queued += 1;
        }
        tracing::debug!(queued, in_flight = in_flight.len(), "draining handlers");
        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }
        for task in background {
            task.abort();
        }
        transition(&state, RuntimeState::Stopped);
    }
}

fn transition(state: &watch::Sender<RuntimeState>, next: RuntimeState) {
    state.send_replace(next);
    tracing::info!(state = %next, "runtime state changed");
}

fn dispatch(registry: &TopicRegistry, message: Message, in_flight: &mut JoinSet<()>) {
    let Message { topic, payload } = message;
    let Some(handler) = registry.get(&topic) else {
        tracing::warn!(%topic, "no handler for topic, message dropped");
        return;
    };
    tracing::debug!(%topic, bytes = payload.len(), "dispatching message");
    in_flight.spawn(async move {
        if let Err(err) = handler(payload).await {
            tracing::error!(%topic, error = %report(&err), "message handler failed");
        }
    });
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(err) = joined {
        tracing::error!(error = %err, "message handler aborted");
    }
}
