//! RocksDB-backed chat log.
//!
//! Key layout: `<room> 0x00 <u64::MAX - created_at_millis, big-endian> 0x00 <id>`.
//! Within one room prefix, ascending byte order is therefore created-at
//! descending, so a forward scan from `<room> 0x00` yields the newest
//! messages first. The id suffix keeps keys unique when two messages land
//! on the same millisecond. Values are the JSON-encoded message.

use std::path::Path;

use async_trait::async_trait;
use huddle_types::{validate, ChatMessage, SendChat};
use rocksdb::{Direction, IteratorMode, Options, DB};

use crate::{clamp_limit, ChatLog, Result, StoreError};

/// Durable append-only log.
pub struct RocksDbChatLog {
    db: DB,
}

impl RocksDbChatLog {
    /// Open or create the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    fn key(msg: &ChatMessage) -> Vec<u8> {
        let millis = msg.created_at.timestamp_millis() as u64;
        let inverted = (u64::MAX - millis).to_be_bytes();

        let mut key = Vec::with_capacity(msg.room.len() + 1 + 8 + 1 + msg.id.len());
        key.extend_from_slice(msg.room.as_bytes());
        key.push(0);
        key.extend_from_slice(&inverted);
        key.push(0);
        key.extend_from_slice(msg.id.as_bytes());
        key
    }

    fn room_prefix(room: &str) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(room.len() + 1);
        prefix.extend_from_slice(room.as_bytes());
        prefix.push(0);
        prefix
    }
}

#[async_trait]
impl ChatLog for RocksDbChatLog {
    async fn append(&self, payload: &SendChat) -> Result<ChatMessage> {
        validate(payload)?;
        let msg = ChatMessage::create(payload);
        let value = serde_json::to_vec(&msg)?;
        self.db.put(Self::key(&msg), value)?;
        Ok(msg)
    }

    async fn history(&self, room: &str, limit: usize) -> Result<Vec<ChatMessage>> {
        let limit = clamp_limit(limit);
        let prefix = Self::room_prefix(room);

        let mut rows = Vec::with_capacity(limit);
        let iter = self
            .db
            .iterator(IteratorMode::From(&prefix, Direction::Forward));
        for entry in iter {
            let (key, value) = entry.map_err(StoreError::from)?;
            if !key.starts_with(&prefix) {
                break;
            }
            rows.push(serde_json::from_slice::<ChatMessage>(&value)?);
            if rows.len() == limit {
                break;
            }
        }

        // The scan is newest-first; hand back a chronological transcript.
        rows.reverse();
        Ok(rows)
    }
}
