//! Client connection handles.

use crate::error::RealtimeError;
use crate::event::ServerEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Unique identifier for a connected client.
pub type ClientId = String;

/// A connected realtime client.
///
/// Room membership is not stored here; the hub keeps it in a bidirectional
/// index so that join/leave/disconnect update both directions atomically.
#[derive(Debug)]
pub struct Client {
    /// Unique client identifier.
    pub id: ClientId,
    /// Channel for sending serialized events to this client's socket task.
    sender: mpsc::UnboundedSender<String>,
}

impl Client {
    /// Create a new client with a message sender.
    pub fn new(id: ClientId, sender: mpsc::UnboundedSender<String>) -> Self {
        Self { id, sender }
    }

    /// Send a raw message to this client.
    pub fn send_raw(&self, message: String) -> Result<(), RealtimeError> {
        self.sender
            .send(message)
            .map_err(|_| RealtimeError::ChannelClosed)
    }

    /// Serialize and send a server event to this client.
    pub fn send(&self, event: &ServerEvent) -> Result<(), RealtimeError> {
        let json = serde_json::to_string(event)?;
        self.send_raw(json)
    }
}

/// Handle for receiving messages destined for the client's socket.
pub type ClientReceiver = mpsc::UnboundedReceiver<String>;

/// Create a new client with its message receiver.
pub fn create_client(id: ClientId) -> (Arc<Client>, ClientReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let client = Arc::new(Client::new(id, sender));
    (client, receiver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_send() {
        let (client, mut rx) = create_client("c1".to_string());

        client
            .send(&ServerEvent::Joined {
                room: "global".to_string(),
            })
            .unwrap();

        let msg = rx.try_recv().unwrap();
        assert!(msg.contains("\"joined\""));
        assert!(msg.contains("\"global\""));
    }

    #[test]
    fn test_send_after_receiver_dropped_fails() {
        let (client, rx) = create_client("c1".to_string());
        drop(rx);

        let err = client.send_raw("hello".to_string()).unwrap_err();
        assert!(matches!(err, RealtimeError::ChannelClosed));
    }
}
