//! REST API for chat history, chat sends and ad-hoc notifications.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use huddle_store::DEFAULT_HISTORY_LIMIT;
use huddle_types::{ChatMessage, NotifyRequest, SendChat};

use crate::error::ApiError;
use crate::{send_chat, send_notify, AppState};

/// Create the service router.
pub fn create_router(state: AppState, client_origin: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat/{room}", get(chat_history))
        .route("/chat", post(post_chat))
        .route("/notify", post(post_notify))
        .route("/realtime/stats", get(realtime_stats))
        .route("/ws", get(crate::ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(client_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(origin = %origin, "invalid client origin, cross-origin requests disabled");
            layer
        }
    }
}

/// Static liveness indicator with the service identity.
async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true, "service": "notifications" }))
}

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

/// Most recent messages of a room, oldest-first.
async fn chat_history(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let rows = state.store.history(&room, limit).await?;
    Ok(Json(rows))
}

/// Persist a chat message and broadcast it to the room.
async fn post_chat(
    State(state): State<AppState>,
    Json(payload): Json<SendChat>,
) -> Result<impl IntoResponse, ApiError> {
    let msg = send_chat(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(msg)))
}

/// Broadcast an ad-hoc notification to the room. Not persisted.
async fn post_notify(
    State(state): State<AppState>,
    Json(req): Json<NotifyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    send_notify(&state, req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "ok": true }))))
}

/// Realtime connection statistics.
async fn realtime_stats(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.hub.stats();
    Json(json!({
        "current_connections": stats.current_connections,
        "total_connections": stats.total_connections,
        "total_joins": stats.total_joins,
        "total_events": stats.total_events,
        "subscribed_rooms": state.bridge.subscribed_rooms().await,
    }))
}
