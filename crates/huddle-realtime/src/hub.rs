//! Room hub: connection registry, membership index, broadcast delivery.

use crate::client::{create_client, Client, ClientId, ClientReceiver};
use crate::error::RealtimeError;
use crate::event::ServerEvent;
use crate::rooms::{JoinOutcome, LeaveOutcome, RoomMemberships};
use huddle_types::{ChatMessage, NotificationEvent, Room};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of concurrent connections.
const MAX_CONNECTIONS: usize = 10_000;

/// Manages live connections, room membership and broadcast delivery.
///
/// Delivery is broadcast-only: no per-recipient acknowledgment, no replay.
/// A connection that is offline at broadcast time simply misses the event.
#[derive(Debug, Default)]
pub struct RoomHub {
    /// Connected clients indexed by ID.
    clients: RwLock<HashMap<ClientId, Arc<Client>>>,
    /// Bidirectional room membership index.
    memberships: RwLock<RoomMemberships>,
    /// Statistics.
    stats: RwLock<HubStats>,
}

impl RoomHub {
    /// Create a new hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a new client and return its message receiver.
    pub fn connect(&self) -> Result<(Arc<Client>, ClientReceiver), RealtimeError> {
        if self.clients.read().len() >= MAX_CONNECTIONS {
            return Err(RealtimeError::ConnectionLimit(MAX_CONNECTIONS));
        }

        let client_id = uuid::Uuid::new_v4().to_string();
        let (client, receiver) = create_client(client_id.clone());

        self.clients.write().insert(client_id.clone(), client.clone());
        self.stats.write().total_connections += 1;

        info!(client_id = %client_id, "client connected");
        Ok((client, receiver))
    }

    /// Disconnect a client, implicitly leaving all its rooms.
    ///
    /// Returns each room the client was in, with a flag for rooms that are
    /// now empty locally, so the caller can release per-room resources.
    pub fn disconnect(&self, client_id: &str) -> Vec<(String, bool)> {
        let removed = self.clients.write().remove(client_id);
        if removed.is_none() {
            return Vec::new();
        }

        let left = self
            .memberships
            .write()
            .remove_client(&client_id.to_string());
        info!(client_id = %client_id, rooms = left.len(), "client disconnected");
        left
    }

    /// Add a client to a room's delivery set.
    ///
    /// An invalid room identifier is ignored silently (returns `None`);
    /// the request never fails back to the caller.
    pub fn join(&self, client: &Arc<Client>, room: &str) -> Option<JoinOutcome> {
        if let Err(e) = Room::parse(room) {
            debug!(client_id = %client.id, room = %room, error = %e, "ignoring join");
            return None;
        }

        let outcome = self.memberships.write().join(&client.id, room);
        if outcome.newly_joined {
            self.stats.write().total_joins += 1;
            debug!(client_id = %client.id, room = %room, "client joined");
        }
        Some(outcome)
    }

    /// Remove a client from a room's delivery set.
    ///
    /// Same silent handling of invalid rooms as [`RoomHub::join`].
    pub fn leave(&self, client: &Arc<Client>, room: &str) -> Option<LeaveOutcome> {
        if let Err(e) = Room::parse(room) {
            debug!(client_id = %client.id, room = %room, error = %e, "ignoring leave");
            return None;
        }

        let outcome = self.memberships.write().leave(&client.id, room);
        if outcome.was_member {
            debug!(client_id = %client.id, room = %room, "client left");
        }
        Some(outcome)
    }

    /// Broadcast a chat message to every current member of its room.
    pub fn broadcast_chat(&self, msg: &ChatMessage) -> usize {
        self.broadcast(&msg.room, ServerEvent::ChatNew(msg.clone()))
    }

    /// Broadcast a notification to every current member of its room.
    pub fn broadcast_notify(&self, event: &NotificationEvent) -> usize {
        self.broadcast(&event.room, ServerEvent::Notify(event.clone()))
    }

    fn broadcast(&self, room: &str, event: ServerEvent) -> usize {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                debug!(room = %room, error = %e, "dropping unserializable event");
                return 0;
            }
        };

        let members = self.memberships.read().members(room);
        let clients = self.clients.read();
        let mut recipients = 0;
        for member in &members {
            if let Some(client) = clients.get(member) {
                // A closed channel means the socket task is gone; the
                // disconnect path will clean the membership up.
                if client.send_raw(json.clone()).is_ok() {
                    recipients += 1;
                }
            }
        }
        drop(clients);

        self.stats.write().total_events += 1;
        debug!(room = %room, recipients = recipients, "event broadcast");
        recipients
    }

    /// Number of local members of `room`.
    pub fn room_size(&self, room: &str) -> usize {
        self.memberships.read().room_size(room)
    }

    /// Current connection count.
    pub fn connection_count(&self) -> usize {
        self.clients.read().len()
    }

    /// Hub statistics.
    pub fn stats(&self) -> HubStats {
        let mut stats = self.stats.read().clone();
        stats.current_connections = self.connection_count();
        stats
    }
}

/// Hub statistics.
#[derive(Debug, Clone, Default)]
pub struct HubStats {
    /// Current number of connections.
    pub current_connections: usize,
    /// Total connections since start.
    pub total_connections: u64,
    /// Total room joins since start.
    pub total_joins: u64,
    /// Total events broadcast since start.
    pub total_events: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_types::{NotifyRequest, SendChat, Severity};

    fn chat_msg(room: &str) -> ChatMessage {
        ChatMessage::create(&SendChat {
            room: room.to_string(),
            user: "Ana".to_string(),
            message: "hola".to_string(),
        })
    }

    fn notify_event(room: &str) -> NotificationEvent {
        NotificationEvent::create(&NotifyRequest {
            room: room.to_string(),
            severity: Severity::Info,
            title: "deploy".to_string(),
            body: String::new(),
        })
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let hub = RoomHub::new();
        let (client, _rx) = hub.connect().unwrap();
        assert_eq!(hub.connection_count(), 1);

        hub.disconnect(&client.id);
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_join_then_broadcast_reaches_member() {
        let hub = RoomHub::new();
        let (client, mut rx) = hub.connect().unwrap();

        let outcome = hub.join(&client, "global").unwrap();
        assert!(outcome.first_local_member);

        let recipients = hub.broadcast_chat(&chat_msg("global"));
        assert_eq!(recipients, 1);

        let raw = rx.try_recv().unwrap();
        assert!(raw.contains("\"chat:new\""));
        assert!(raw.contains("hola"));
    }

    #[tokio::test]
    async fn test_sender_is_included_in_broadcast() {
        let hub = RoomHub::new();
        let (sender, mut sender_rx) = hub.connect().unwrap();
        let (other, mut other_rx) = hub.connect().unwrap();
        hub.join(&sender, "global").unwrap();
        hub.join(&other, "global").unwrap();

        hub.broadcast_chat(&chat_msg("global"));

        assert!(sender_rx.try_recv().is_ok());
        assert!(other_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_broadcast_is_room_scoped() {
        let hub = RoomHub::new();
        let (member, mut member_rx) = hub.connect().unwrap();
        let (outsider, mut outsider_rx) = hub.connect().unwrap();
        hub.join(&member, "project:p1").unwrap();
        hub.join(&outsider, "project:p2").unwrap();

        hub.broadcast_notify(&notify_event("project:p1"));

        assert!(member_rx.try_recv().is_ok());
        assert!(outsider_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_join_invalid_room_is_silently_ignored() {
        let hub = RoomHub::new();
        let (client, _rx) = hub.connect().unwrap();

        assert!(hub.join(&client, "").is_none());
        assert!(hub.join(&client, "lobby").is_none());
        assert_eq!(hub.room_size(""), 0);
    }

    #[tokio::test]
    async fn test_leave_removes_from_delivery_set() {
        let hub = RoomHub::new();
        let (client, mut rx) = hub.connect().unwrap();
        hub.join(&client, "global").unwrap();

        let outcome = hub.leave(&client, "global").unwrap();
        assert!(outcome.was_member);
        assert!(outcome.room_now_empty);

        hub.broadcast_notify(&notify_event("global"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_implicitly_leaves_rooms() {
        let hub = RoomHub::new();
        let (client, _rx) = hub.connect().unwrap();
        hub.join(&client, "global").unwrap();
        hub.join(&client, "project:p1").unwrap();

        let mut left = hub.disconnect(&client.id);
        left.sort();
        assert_eq!(
            left,
            vec![
                ("global".to_string(), true),
                ("project:p1".to_string(), true)
            ]
        );
        assert_eq!(hub.room_size("global"), 0);
    }

    #[tokio::test]
    async fn test_stats() {
        let hub = RoomHub::new();
        let (client, _rx) = hub.connect().unwrap();
        hub.join(&client, "global").unwrap();
        hub.broadcast_chat(&chat_msg("global"));

        let stats = hub.stats();
        assert_eq!(stats.current_connections, 1);
        assert_eq!(stats.total_connections, 1);
        assert_eq!(stats.total_joins, 1);
        assert_eq!(stats.total_events, 1);
    }
}
