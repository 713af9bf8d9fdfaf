//! WebSocket entry into the realtime protocol.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use huddle_realtime::{ChatAck, Client, ClientEvent, ServerEvent};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{send_chat, AppState};

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one WebSocket connection through the hub.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (client, mut receiver) = match state.hub.connect() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "rejecting connection");
            return;
        }
    };

    let client_id = client.id.clone();
    info!(client_id = %client_id, "websocket client connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Forward hub events to the socket.
    let client_id_send = client_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = receiver.recv().await {
            if ws_sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
        debug!(client_id = %client_id_send, "send task ended");
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_event(&state, &client, &text).await;
            }
            Ok(Message::Close(_)) => {
                debug!(client_id = %client_id, "close received");
                break;
            }
            Ok(_) => {
                // Ping/pong handled by axum; binary unsupported.
            }
            Err(e) => {
                error!(client_id = %client_id, error = %e, "websocket error");
                break;
            }
        }
    }

    send_task.abort();
    for (room, now_empty) in state.hub.disconnect(&client_id) {
        if now_empty {
            state.bridge.release_room(&room).await;
        }
    }
    info!(client_id = %client_id, "websocket client disconnected");
}

/// Dispatch one client event.
///
/// Always answers through the event/ack contract; never tears the
/// connection down on bad input.
async fn handle_event(state: &AppState, client: &Arc<Client>, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Join { room }) => {
            if let Some(outcome) = state.hub.join(client, &room) {
                if outcome.first_local_member {
                    if let Err(e) = state.bridge.ensure_room(&room).await {
                        warn!(room = %room, error = %e, "room subscription failed");
                    }
                }
                let _ = client.send(&ServerEvent::Joined { room });
            }
        }
        Ok(ClientEvent::Leave { room }) => {
            if let Some(outcome) = state.hub.leave(client, &room) {
                if outcome.room_now_empty {
                    state.bridge.release_room(&room).await;
                }
            }
        }
        Ok(ClientEvent::ChatSend(payload)) => {
            let ack = match send_chat(state, payload).await {
                Ok(msg) => ChatAck::accepted(msg),
                Err(e) => ChatAck::rejected(e.to_string()),
            };
            let _ = client.send(&ServerEvent::Ack(ack));
        }
        Err(e) => {
            debug!(client_id = %client.id, error = %e, "invalid client event");
            let _ = client.send(&ServerEvent::Error {
                message: format!("invalid event: {e}"),
            });
        }
    }
}
