//! Bridge between room membership and pub/sub topics.
//!
//! Every chat message and notification travels through the pub/sub bridge,
//! whatever the transport: the sender publishes to `chat:<room>` or
//! `notify:<room>`, and delivery to local connections happens in the topic
//! handler. With a broker configured, instances holding members of the
//! room receive the same events, so a REST-triggered send on one instance
//! reaches sockets connected to another.
//!
//! Topic subscriptions follow local membership: the first local member of
//! a room opens its two topic subscriptions, the last one out releases
//! them. No wildcard subscriptions anywhere.

use std::collections::HashMap;
use std::sync::Arc;

use huddle_pubsub::{Handler, PubSub, PubSubError, Subscription};
use huddle_realtime::RoomHub;
use huddle_types::{ChatMessage, NotificationEvent};
use tokio::sync::Mutex;
use tracing::debug;

/// Active topic subscriptions of one room.
struct RoomTopics {
    _chat: Subscription,
    _notify: Subscription,
}

/// Links the hub's room membership to per-room topic subscriptions.
pub struct RoomBridge {
    pubsub: Arc<dyn PubSub>,
    hub: Arc<RoomHub>,
    rooms: Mutex<HashMap<String, RoomTopics>>,
}

impl RoomBridge {
    /// Create a bridge over the given transport and hub.
    pub fn new(pubsub: Arc<dyn PubSub>, hub: Arc<RoomHub>) -> Self {
        Self {
            pubsub,
            hub,
            rooms: Mutex::new(HashMap::new()),
        }
    }

    fn chat_topic(room: &str) -> String {
        format!("chat:{room}")
    }

    fn notify_topic(room: &str) -> String {
        format!("notify:{room}")
    }

    /// Subscribe the room's topics if this instance has not already.
    ///
    /// Called when a room gains its first local member. Idempotent; the
    /// lock is held across the subscribe calls so concurrent joins cannot
    /// double-subscribe.
    pub async fn ensure_room(&self, room: &str) -> Result<(), PubSubError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(room) {
            return Ok(());
        }

        let hub = Arc::clone(&self.hub);
        let chat_handler: Handler = Arc::new(move |value| {
            match serde_json::from_value::<ChatMessage>(value) {
                Ok(msg) => {
                    hub.broadcast_chat(&msg);
                }
                Err(e) => debug!(error = %e, "dropping malformed chat payload"),
            }
        });
        let chat = self
            .pubsub
            .subscribe(&Self::chat_topic(room), chat_handler)
            .await?;

        let hub = Arc::clone(&self.hub);
        let notify_handler: Handler = Arc::new(move |value| {
            match serde_json::from_value::<NotificationEvent>(value) {
                Ok(event) => {
                    hub.broadcast_notify(&event);
                }
                Err(e) => debug!(error = %e, "dropping malformed notify payload"),
            }
        });
        let notify = self
            .pubsub
            .subscribe(&Self::notify_topic(room), notify_handler)
            .await?;

        rooms.insert(
            room.to_string(),
            RoomTopics {
                _chat: chat,
                _notify: notify,
            },
        );
        debug!(room = %room, "room topics subscribed");
        Ok(())
    }

    /// Drop the room's topic subscriptions.
    ///
    /// Called when the last local member leaves or disconnects.
    pub async fn release_room(&self, room: &str) {
        if self.rooms.lock().await.remove(room).is_some() {
            debug!(room = %room, "room topics released");
        }
    }

    /// Publish a persisted chat message to its room topic.
    pub async fn publish_chat(&self, msg: &ChatMessage) -> Result<(), PubSubError> {
        self.pubsub
            .publish(&Self::chat_topic(&msg.room), serde_json::to_value(msg)?)
            .await
    }

    /// Publish a notification to its room topic.
    pub async fn publish_notify(&self, event: &NotificationEvent) -> Result<(), PubSubError> {
        self.pubsub
            .publish(&Self::notify_topic(&event.room), serde_json::to_value(event)?)
            .await
    }

    /// Number of rooms with live topic subscriptions.
    pub async fn subscribed_rooms(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Release the underlying transport.
    pub async fn shutdown(&self) {
        self.rooms.lock().await.clear();
        self.pubsub.shutdown().await;
    }
}
