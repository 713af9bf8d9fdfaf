//! In-process event bus.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::{Handler, PubSub, PubSubError, Subscription};

/// Topic-indexed handler registry shared with subscription guards.
type Registry = Arc<RwLock<HashMap<String, Vec<(u64, Handler)>>>>;

/// Single-process pub/sub: handlers are invoked synchronously in the
/// publisher's task, no cross-process delivery.
#[derive(Default)]
pub struct InProcessBus {
    registry: Registry,
    next_id: AtomicU64,
}

impl InProcessBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers currently registered for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry.read().get(topic).map_or(0, Vec::len)
    }
}

#[async_trait]
impl PubSub for InProcessBus {
    async fn publish(&self, topic: &str, payload: Value) -> Result<(), PubSubError> {
        // Snapshot handlers so the lock is not held while they run.
        let handlers: Vec<Handler> = self
            .registry
            .read()
            .get(topic)
            .map(|entries| entries.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        debug!(topic = %topic, handlers = handlers.len(), "publishing in-process");
        for handler in handlers {
            handler(payload.clone());
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str, handler: Handler) -> Result<Subscription, PubSubError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .write()
            .entry(topic.to_string())
            .or_default()
            .push((id, handler));

        let registry = Arc::clone(&self.registry);
        let topic = topic.to_string();
        Ok(Subscription::new(move || {
            let mut registry = registry.write();
            if let Some(entries) = registry.get_mut(&topic) {
                entries.retain(|(entry_id, _)| *entry_id != id);
                if entries.is_empty() {
                    registry.remove(&topic);
                }
            }
        }))
    }
}
