//! Room identifiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a room identifier string.
pub const MAX_ROOM_LENGTH: usize = 120;

/// A chat/notification room.
///
/// Rooms travel on the wire as opaque strings; this type gives them a
/// parsed form so that join/leave can reject garbage identifiers.
///
/// Formats:
/// - `global` - the application-wide room
/// - `project:<projectId>` - the room of a single project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Room {
    /// The application-wide room.
    Global,
    /// The room of a single project.
    Project(String),
}

impl Room {
    /// Parse a room string.
    pub fn parse(s: &str) -> Result<Self, RoomError> {
        if s.is_empty() {
            return Err(RoomError::Empty);
        }
        if s.len() > MAX_ROOM_LENGTH {
            return Err(RoomError::TooLong(s.len()));
        }

        if s == "global" {
            return Ok(Room::Global);
        }

        match s.strip_prefix("project:") {
            Some(id) if !id.is_empty() => Ok(Room::Project(id.to_string())),
            _ => Err(RoomError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Room::Global => write!(f, "global"),
            Room::Project(id) => write!(f, "project:{}", id),
        }
    }
}

/// Errors produced when parsing a room string.
#[derive(Debug, Clone, Error)]
pub enum RoomError {
    /// The room string is empty.
    #[error("room is empty")]
    Empty,

    /// The room string exceeds [`MAX_ROOM_LENGTH`].
    #[error("room exceeds {MAX_ROOM_LENGTH} characters: {0}")]
    TooLong(usize),

    /// The room string is neither `global` nor `project:<id>`.
    #[error("unknown room format: {0}")]
    UnknownFormat(String),
}
