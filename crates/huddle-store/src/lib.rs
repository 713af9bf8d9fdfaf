//! # Huddle Store
//!
//! Append-only chat message log.
//!
//! Messages are owned exclusively by this crate: they are created by
//! [`ChatLog::append`] and never updated or deleted. History queries scan
//! newest-first internally and reverse before returning, so callers always
//! receive a chronological transcript bounded to the most recent N entries.
//!
//! Two backends implement the [`ChatLog`] trait:
//!
//! - [`MemoryChatLog`]: process-local, for tests and single-node dev runs.
//! - [`RocksDbChatLog`]: durable, keyed for (room, created-at descending)
//!   prefix scans.

pub mod error;
pub mod memory;
pub mod persistent;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use huddle_types::{ChatMessage, SendChat};

pub use error::{Result, StoreError};
pub use memory::MemoryChatLog;
pub use persistent::RocksDbChatLog;

/// Default number of history entries when the caller does not ask for more.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Hard cap on history entries per query.
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Clamp a requested history limit into `1..=MAX_HISTORY_LIMIT`.
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_HISTORY_LIMIT)
}

/// The append-only chat log.
#[async_trait]
pub trait ChatLog: Send + Sync {
    /// Validate and persist a message, stamping identifier and timestamp.
    ///
    /// Fails with [`StoreError::Validation`] when room/user/message violate
    /// their presence or length constraints; nothing is written in that
    /// case.
    async fn append(&self, payload: &SendChat) -> Result<ChatMessage>;

    /// The most recent `limit` messages of `room`, oldest-first.
    ///
    /// `limit` is clamped to `1..=MAX_HISTORY_LIMIT`. An unknown room
    /// yields an empty transcript.
    async fn history(&self, room: &str, limit: usize) -> Result<Vec<ChatMessage>>;
}

/// Chat log configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Database directory; absence selects the in-memory backend.
    pub path: Option<PathBuf>,
}

/// Open the configured backend.
pub fn open(config: &StoreConfig) -> Result<Arc<dyn ChatLog>> {
    match &config.path {
        Some(path) => {
            let log = RocksDbChatLog::open(path)?;
            tracing::info!(path = %path.display(), "chat log opened (rocksdb)");
            Ok(Arc::new(log))
        }
        None => {
            tracing::info!("chat log running in-memory (no store path configured)");
            Ok(Arc::new(MemoryChatLog::new()))
        }
    }
}
