//! # Huddle Pub/Sub
//!
//! Uniform publish/subscribe bridge for the Huddle realtime layer.
//!
//! Two interchangeable transports sit behind the [`PubSub`] trait:
//!
//! - [`InProcessBus`]: a topic-indexed handler registry within one process.
//!   Suitable for single-instance deployments and tests.
//! - [`RedisBridge`]: Redis PUBLISH/SUBSCRIBE, so every service instance
//!   sharing the broker observes the same events. Topics are namespaced
//!   `huddle:<topic>` on the wire.
//!
//! Delivery is best-effort, at-most-once. There is no replay and no
//! subscriber acknowledgment; a malformed broker payload is dropped
//! silently. Callers never need to know which transport is active.
//!
//! The transport is chosen once at process startup from [`PubSubConfig`]
//! and passed around as `Arc<dyn PubSub>` - no global singletons.

pub mod broker;
pub mod bus;
pub mod error;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

pub use broker::RedisBridge;
pub use bus::InProcessBus;
pub use error::PubSubError;

/// Callback invoked with each message delivered to a subscription.
pub type Handler = Arc<dyn Fn(Value) + Send + Sync>;

/// Publish/subscribe over topic strings.
#[async_trait]
pub trait PubSub: Send + Sync {
    /// Deliver `payload` to all current subscribers of exactly `topic`.
    ///
    /// Fire-and-forget: an error means the message could not be handed to
    /// the transport, never that a subscriber rejected it.
    async fn publish(&self, topic: &str, payload: Value) -> Result<(), PubSubError>;

    /// Register `handler` for messages on exactly `topic`.
    ///
    /// The returned [`Subscription`] unsubscribes when dropped.
    async fn subscribe(&self, topic: &str, handler: Handler) -> Result<Subscription, PubSubError>;

    /// Release transport resources. Idempotent; the in-process bus has
    /// nothing to release.
    async fn shutdown(&self) {}
}

/// Handle for an active subscription; dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unsubscribe explicitly instead of relying on drop.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Pub/sub transport configuration.
#[derive(Debug, Clone, Default)]
pub struct PubSubConfig {
    /// Redis connection string; absence selects the in-process bus.
    pub redis_url: Option<String>,
}

/// Create the configured transport.
///
/// A present, non-empty `redis_url` selects [`RedisBridge`]; otherwise the
/// process falls back to [`InProcessBus`].
pub async fn connect(config: &PubSubConfig) -> Result<Arc<dyn PubSub>, PubSubError> {
    match config.redis_url.as_deref() {
        Some(url) if !url.is_empty() => {
            let bridge = RedisBridge::connect(url).await?;
            tracing::info!("pub/sub bridge connected to Redis broker");
            Ok(Arc::new(bridge))
        }
        _ => {
            tracing::info!("pub/sub bridge running in-process (no broker configured)");
            Ok(Arc::new(InProcessBus::new()))
        }
    }
}
