//! # Huddle Realtime
//!
//! Room-based realtime hub for chat and notifications.
//!
//! The hub manages live connections and a bidirectional room membership
//! index, and delivers `chat:new` and `notify` events to every connection
//! currently in the target room. Rooms are `global` or `project:<id>`;
//! join/leave requests with invalid room identifiers are ignored silently.
//!
//! ## Wire protocol
//!
//! Client -> server (flat, tagged by `type`):
//!
//! ```json
//! {"type": "join", "room": "project:p1"}
//! {"type": "leave", "room": "project:p1"}
//! {"type": "chat:send", "room": "global", "user": "Ana", "message": "hola"}
//! ```
//!
//! Server -> client (payload under `data`, since a notification payload
//! carries its own `type` field for severity):
//!
//! ```json
//! {"type": "joined", "data": {"room": "project:p1"}}
//! {"type": "chat:new", "data": {"id": "...", "room": "global", "user": "Ana", "message": "hola", "createdAt": "..."}}
//! {"type": "notify", "data": {"room": "global", "type": "info", "title": "...", "body": "", "ts": "..."}}
//! {"type": "ack", "data": {"ok": true, "msg": {...}}}
//! ```
//!
//! The hub does not talk to the store or the pub/sub bridge itself; the
//! notification service drives it, so that persistence always completes
//! before broadcast and cross-instance delivery goes through the bridge.

pub mod client;
pub mod error;
pub mod event;
pub mod hub;
pub mod rooms;

pub use client::{Client, ClientId, ClientReceiver};
pub use error::RealtimeError;
pub use event::{ChatAck, ClientEvent, ServerEvent};
pub use hub::{HubStats, RoomHub};
pub use rooms::{JoinOutcome, LeaveOutcome, RoomMemberships};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_flow() {
        let hub = RoomHub::new();

        let (client, mut rx) = hub.connect().unwrap();
        assert_eq!(hub.connection_count(), 1);

        hub.join(&client, "global").unwrap();

        let msg = huddle_types::ChatMessage::create(&huddle_types::SendChat {
            room: "global".to_string(),
            user: "Ana".to_string(),
            message: "hola".to_string(),
        });
        assert_eq!(hub.broadcast_chat(&msg), 1);
        assert!(rx.try_recv().is_ok());

        hub.disconnect(&client.id);
        assert_eq!(hub.connection_count(), 0);
    }
}
