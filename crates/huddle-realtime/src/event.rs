//! Wire events exchanged with realtime clients.

use huddle_types::{ChatMessage, NotificationEvent, SendChat};
use serde::{Deserialize, Serialize};

/// Events a client sends to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Join a room.
    #[serde(rename = "join")]
    Join { room: String },
    /// Leave a room.
    #[serde(rename = "leave")]
    Leave { room: String },
    /// Send a chat message; answered with an `ack`.
    #[serde(rename = "chat:send")]
    ChatSend(SendChat),
}

/// Events the server sends to a client.
///
/// Adjacently tagged: the payload rides under `data`, so payload fields
/// never collide with the envelope's `type` tag (a notification carries
/// its own `type` field for severity).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerEvent {
    /// Join acknowledged, sent to the joining connection only.
    #[serde(rename = "joined")]
    Joined { room: String },
    /// A new chat message, broadcast to the whole room.
    #[serde(rename = "chat:new")]
    ChatNew(ChatMessage),
    /// A notification, broadcast to the whole room.
    #[serde(rename = "notify")]
    Notify(NotificationEvent),
    /// Result of this connection's `chat:send`.
    #[serde(rename = "ack")]
    Ack(ChatAck),
    /// Protocol-level error (unparseable client event).
    #[serde(rename = "error")]
    Error { message: String },
}

/// Acknowledgment payload for `chat:send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAck {
    /// Whether the message was persisted and broadcast.
    pub ok: bool,
    /// The stored message on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<ChatMessage>,
    /// Failure description on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatAck {
    /// Successful ack carrying the stored message.
    pub fn accepted(msg: ChatMessage) -> Self {
        Self {
            ok: true,
            msg: Some(msg),
            error: None,
        }
    }

    /// Failed ack carrying the error description.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            msg: None,
            error: Some(error.into()),
        }
    }
}
