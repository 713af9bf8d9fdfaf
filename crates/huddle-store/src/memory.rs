//! In-memory chat log backend.

use async_trait::async_trait;
use huddle_types::{validate, ChatMessage, SendChat};
use parking_lot::RwLock;

use crate::{clamp_limit, ChatLog, Result};

/// Process-local append-only log.
#[derive(Debug, Default)]
pub struct MemoryChatLog {
    messages: RwLock<Vec<ChatMessage>>,
}

impl MemoryChatLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored messages across all rooms.
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// Returns true if no messages are stored.
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

#[async_trait]
impl ChatLog for MemoryChatLog {
    async fn append(&self, payload: &SendChat) -> Result<ChatMessage> {
        validate(payload)?;
        let msg = ChatMessage::create(payload);
        self.messages.write().push(msg.clone());
        Ok(msg)
    }

    async fn history(&self, room: &str, limit: usize) -> Result<Vec<ChatMessage>> {
        let limit = clamp_limit(limit);
        let messages = self.messages.read();
        // Newest-first scan, then reverse into a chronological transcript.
        let mut rows: Vec<ChatMessage> = messages
            .iter()
            .rev()
            .filter(|m| m.room == room)
            .take(limit)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StoreError, MAX_HISTORY_LIMIT};

    fn payload(room: &str, message: &str) -> SendChat {
        SendChat {
            room: room.to_string(),
            user: "Ana".to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_returns_persisted_message() {
        let log = MemoryChatLog::new();
        let msg = log.append(&payload("global", "hola")).await.unwrap();

        assert!(!msg.id.is_empty());
        assert_eq!(msg.room, "global");
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_append_rejects_invalid_payload() {
        let log = MemoryChatLog::new();
        let mut bad = payload("global", "hola");
        bad.user = String::new();

        let err = log.append(&bad).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_history_is_chronological() {
        let log = MemoryChatLog::new();
        for i in 0..5 {
            log.append(&payload("global", &format!("m{i}"))).await.unwrap();
        }

        let rows = log.history("global", 30).await.unwrap();
        assert_eq!(rows.len(), 5);
        for pair in rows.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
        assert_eq!(rows[0].message, "m0");
        assert_eq!(rows[4].message, "m4");
    }

    #[tokio::test]
    async fn test_history_returns_most_recent_entries() {
        let log = MemoryChatLog::new();
        for i in 0..10 {
            log.append(&payload("global", &format!("m{i}"))).await.unwrap();
        }

        let rows = log.history("global", 3).await.unwrap();
        assert_eq!(rows.len(), 3);
        // The three newest, oldest-first.
        assert_eq!(rows[0].message, "m7");
        assert_eq!(rows[2].message, "m9");
    }

    #[tokio::test]
    async fn test_history_filters_by_room() {
        let log = MemoryChatLog::new();
        log.append(&payload("global", "a")).await.unwrap();
        log.append(&payload("project:p1", "b")).await.unwrap();

        let rows = log.history("project:p1", 30).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message, "b");

        assert!(log.history("project:p2", 30).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let log = MemoryChatLog::new();
        for i in 0..120 {
            log.append(&payload("global", &format!("m{i}"))).await.unwrap();
        }

        let rows = log.history("global", 500).await.unwrap();
        assert_eq!(rows.len(), MAX_HISTORY_LIMIT);

        let rows = log.history("global", 0).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
