//! Redis-backed pub/sub bridge.
//!
//! Uses `redis::aio::ConnectionManager` for publishing and a dedicated
//! subscriber connection driven by a background task for delivery. Both
//! connections are opened once at startup and reused for the process
//! lifetime.
//!
//! Topics are namespaced `huddle:<topic>` on the wire so that unrelated
//! traffic on a shared broker never collides with ours. Payloads are JSON
//! on the wire; a payload that fails to decode is dropped with a debug log,
//! since pub/sub delivery is best-effort.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use parking_lot::RwLock;
use redis::aio::{ConnectionManager, PubSubSink};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{Handler, PubSub, PubSubError, Subscription};

/// Wire namespace for all Huddle topics.
const TOPIC_PREFIX: &str = "huddle:";

/// Topic-indexed handler registry shared with the listener task.
type Registry = Arc<RwLock<HashMap<String, Vec<(u64, Handler)>>>>;

/// Full wire name of a topic.
pub(crate) fn full_topic(topic: &str) -> String {
    format!("{TOPIC_PREFIX}{topic}")
}

/// Decode a wire payload; `None` means it is dropped.
pub(crate) fn decode(payload: &str) -> Option<Value> {
    serde_json::from_str(payload).ok()
}

/// Pub/sub bridge over a shared Redis broker.
pub struct RedisBridge {
    publish_conn: ConnectionManager,
    sink: Arc<Mutex<PubSubSink>>,
    registry: Registry,
    next_id: AtomicU64,
    release_tx: mpsc::UnboundedSender<String>,
    listener: JoinHandle<()>,
    control: JoinHandle<()>,
}

impl RedisBridge {
    /// Connect both broker connections and start the listener task.
    pub async fn connect(url: &str) -> Result<Self, PubSubError> {
        let client =
            redis::Client::open(url).map_err(|e| PubSubError::Connection(e.to_string()))?;

        let publish_conn = ConnectionManager::new(client.clone())
            .await
            .map_err(|e| PubSubError::Connection(e.to_string()))?;

        let pubsub = client
            .get_async_pubsub()
            .await
            .map_err(|e| PubSubError::Connection(e.to_string()))?;
        let (sink, mut stream) = pubsub.split();

        let registry: Registry = Arc::new(RwLock::new(HashMap::new()));
        let sink = Arc::new(Mutex::new(sink));

        let listener_registry = Arc::clone(&registry);
        let listener = tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                let channel = msg.get_channel_name().to_string();
                let Some(topic) = channel.strip_prefix(TOPIC_PREFIX) else {
                    continue;
                };
                let payload: String = match msg.get_payload() {
                    Ok(payload) => payload,
                    Err(e) => {
                        debug!(channel = %channel, error = %e, "dropping non-text payload");
                        continue;
                    }
                };
                let Some(value) = decode(&payload) else {
                    debug!(channel = %channel, "dropping malformed payload");
                    continue;
                };

                let handlers: Vec<Handler> = listener_registry
                    .read()
                    .get(topic)
                    .map(|entries| entries.iter().map(|(_, h)| h.clone()).collect())
                    .unwrap_or_default();
                for handler in handlers {
                    handler(value.clone());
                }
            }
            debug!("broker listener stream ended");
        });

        // Wire-level unsubscribes happen off the drop path, which cannot
        // await; the control task drains release requests instead.
        let (release_tx, mut release_rx) = mpsc::unbounded_channel::<String>();
        let control_registry = Arc::clone(&registry);
        let control_sink = Arc::clone(&sink);
        let control = tokio::spawn(async move {
            while let Some(topic) = release_rx.recv().await {
                // A new subscriber may have re-registered the topic while
                // the request was queued.
                if control_registry.read().contains_key(&topic) {
                    continue;
                }
                if let Err(e) = control_sink.lock().await.unsubscribe(full_topic(&topic)).await {
                    warn!(topic = %topic, error = %e, "wire unsubscribe failed");
                }
            }
        });

        Ok(Self {
            publish_conn,
            sink,
            registry,
            next_id: AtomicU64::new(0),
            release_tx,
            listener,
            control,
        })
    }
}

#[async_trait]
impl PubSub for RedisBridge {
    async fn publish(&self, topic: &str, payload: Value) -> Result<(), PubSubError> {
        let body = serde_json::to_string(&payload)?;
        let mut conn = self.publish_conn.clone();
        redis::cmd("PUBLISH")
            .arg(full_topic(topic))
            .arg(body)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| PubSubError::Publish(e.to_string()))?;
        Ok(())
    }

    async fn subscribe(&self, topic: &str, handler: Handler) -> Result<Subscription, PubSubError> {
        // First local subscriber of a topic opens the wire subscription;
        // later ones piggyback on it.
        let needs_wire = !self.registry.read().contains_key(topic);
        if needs_wire {
            self.sink
                .lock()
                .await
                .subscribe(full_topic(topic))
                .await
                .map_err(|e| PubSubError::Subscribe(e.to_string()))?;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .write()
            .entry(topic.to_string())
            .or_default()
            .push((id, handler));

        let registry = Arc::clone(&self.registry);
        let release_tx = self.release_tx.clone();
        let topic = topic.to_string();
        Ok(Subscription::new(move || {
            let mut emptied = false;
            {
                let mut reg = registry.write();
                if let Some(entries) = reg.get_mut(&topic) {
                    entries.retain(|(entry_id, _)| *entry_id != id);
                    if entries.is_empty() {
                        reg.remove(&topic);
                        emptied = true;
                    }
                }
            }
            if emptied {
                let _ = release_tx.send(topic);
            }
        }))
    }

    async fn shutdown(&self) {
        self.listener.abort();
        self.control.abort();
        debug!("broker connections released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_topic_is_namespaced() {
        assert_eq!(full_topic("chat:global"), "huddle:chat:global");
        assert_eq!(full_topic("notify:project:p1"), "huddle:notify:project:p1");
    }

    #[test]
    fn test_decode_roundtrip() {
        let value = decode(r#"{"room":"global","message":"hola"}"#).unwrap();
        assert_eq!(value["room"], "global");
    }

    #[test]
    fn test_decode_drops_malformed() {
        assert!(decode("not json at all {").is_none());
        assert!(decode("").is_none());
    }

    #[test]
    fn test_prefix_strips_back_to_topic() {
        let full = full_topic("chat:global");
        assert_eq!(full.strip_prefix(TOPIC_PREFIX), Some("chat:global"));
    }
}
