//! Topic registry: the table binding inbound topics to handlers.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use deliveryapp_domain::error::DeliveryError;

/// Boxed future returned by a [`TopicHandler`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send>>;

/// A type-erased handler receiving the raw payload of one message.
pub type TopicHandler = Arc<dyn Fn(Vec<u8>) -> HandlerFuture + Send + Sync>;

/// Map from topic name to handler, populated before the runtime starts.
#[derive(Default)]
pub struct TopicRegistry {
    handlers: HashMap<String, TopicHandler>,
}

impl TopicRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `topic`, replacing any previous binding.
    pub fn register<F, Fut>(&mut self, topic: impl Into<String>, handler: F)
    where
        F: Fn(Vec<u8>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), DeliveryError>> + Send + 'static,
    {
        let topic = topic.into();
        tracing::debug!(%topic, "handler registered");
        self.handlers
            .insert(topic, Arc::new(move |payload| -> HandlerFuture {
                Box::pin(handler(payload))
            }));
    }

    /// The handler bound to `topic`, if any.
    #[must_use]
    pub fn get(&self, topic: &str) -> Option<TopicHandler> {
        self.handlers.get(topic).cloned()
    }

    /// Every registered topic, in no particular order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
