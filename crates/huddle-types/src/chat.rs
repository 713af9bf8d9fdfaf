//! Chat message payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for sending a chat message.
///
/// Arrives over both REST (`POST /chat`) and the realtime `chat:send`
/// event; the constraints mirror what the store enforces on append.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendChat {
    /// Target room identifier.
    #[validate(length(min = 1, max = 120))]
    pub room: String,
    /// Display name of the sender.
    #[validate(length(min = 1, max = 80))]
    pub user: String,
    /// Message body.
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
}

/// A persisted chat message.
///
/// Immutable once created; the log is append-only. Display order is
/// creation time ascending, which is why history queries reverse their
/// newest-first scan before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Generated identifier.
    pub id: String,
    /// Room the message belongs to.
    pub room: String,
    /// Display name of the sender.
    pub user: String,
    /// Message body.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message from a validated send payload, stamping a fresh
    /// identifier and timestamp.
    pub fn create(payload: &SendChat) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            room: payload.room.clone(),
            user: payload.user.clone(),
            message: payload.message.clone(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;

    fn payload() -> SendChat {
        SendChat {
            room: "global".to_string(),
            user: "Ana".to_string(),
            message: "hola".to_string(),
        }
    }

    #[test]
    fn test_valid_payload() {
        assert!(validate(&payload()).is_ok());
    }

    #[test]
    fn test_empty_user_rejected() {
        let mut p = payload();
        p.user = String::new();
        assert!(validate(&p).is_err());
    }

    #[test]
    fn test_oversized_message_rejected() {
        let mut p = payload();
        p.message = "x".repeat(1001);
        assert!(validate(&p).is_err());
    }

    #[test]
    fn test_empty_room_rejected() {
        let mut p = payload();
        p.room = String::new();
        assert!(validate(&p).is_err());
    }

    #[test]
    fn test_create_stamps_id_and_timestamp() {
        let msg = ChatMessage::create(&payload());
        assert!(!msg.id.is_empty());
        assert_eq!(msg.room, "global");
        assert_eq!(msg.user, "Ana");
        assert_eq!(msg.message, "hola");
    }

    #[test]
    fn test_serializes_camel_case() {
        let msg = ChatMessage::create(&payload());
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("\"created_at\""));
    }
}
