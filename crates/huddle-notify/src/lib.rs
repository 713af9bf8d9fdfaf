//! # Huddle Notify
//!
//! The notifications service: chat history, chat sends and ad-hoc
//! notifications over REST, plus the realtime WebSocket API.
//!
//! Both entry points share one send path: validate, persist through the
//! chat log, then publish to the room's pub/sub topic. Delivery to local
//! sockets happens in the topic handler installed by [`RoomBridge`], so a
//! REST-triggered send reaches realtime clients on every instance sharing
//! the broker. Notifications skip persistence; everything else is the
//! same.
//!
//! ## Modules
//!
//! - [`api`] - REST routes and router assembly
//! - [`ws`] - WebSocket handler speaking the realtime protocol
//! - [`bridge`] - room membership <-> pub/sub topic subscriptions
//! - [`config`] - environment-backed configuration
//! - [`error`] - API error type and HTTP mapping

pub mod api;
pub mod bridge;
pub mod config;
pub mod error;
pub mod ws;

use std::sync::Arc;

use huddle_realtime::RoomHub;
use huddle_store::ChatLog;
use huddle_types::{validate, ChatMessage, NotificationEvent, NotifyRequest, SendChat};

pub use api::create_router;
pub use bridge::RoomBridge;
pub use config::NotifyConfig;
pub use error::ApiError;

/// Shared state of the notifications service.
#[derive(Clone)]
pub struct AppState {
    /// Realtime hub.
    pub hub: Arc<RoomHub>,
    /// Append-only chat log.
    pub store: Arc<dyn ChatLog>,
    /// Room/topic bridge over the pub/sub transport.
    pub bridge: Arc<RoomBridge>,
}

/// Validate, persist and publish a chat message.
///
/// Persistence completes strictly before publication; on any failure
/// nothing is broadcast and no partial write remains.
pub async fn send_chat(state: &AppState, payload: SendChat) -> Result<ChatMessage, ApiError> {
    let msg = state.store.append(&payload).await?;
    state.bridge.publish_chat(&msg).await?;
    Ok(msg)
}

/// Validate and publish an ad-hoc notification. Never persisted.
pub async fn send_notify(
    state: &AppState,
    req: NotifyRequest,
) -> Result<NotificationEvent, ApiError> {
    validate(&req)?;
    let event = NotificationEvent::create(&req);
    state.bridge.publish_notify(&event).await?;
    Ok(event)
}
