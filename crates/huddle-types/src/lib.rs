//! # Huddle Types
//!
//! Shared domain types for the Huddle project collaboration services.
//!
//! This crate defines the chat and notification payloads exchanged between
//! the gateway, the notification service and connected clients, together
//! with their validation rules. Every other crate in the workspace builds
//! on these types, so the wire format lives here and nowhere else.
//!
//! ## Rooms
//!
//! Chat and notifications are scoped to rooms. A room is an opaque string,
//! either `global` or `project:<projectId>`; see [`Room`].

pub mod chat;
pub mod notify;
pub mod room;
pub mod validate;

pub use chat::{ChatMessage, SendChat};
pub use notify::{NotificationEvent, NotifyRequest, Severity};
pub use room::{Room, RoomError, MAX_ROOM_LENGTH};
pub use validate::{validate, ValidationError};
