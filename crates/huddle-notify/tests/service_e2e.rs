//! End-to-end tests for the notifications service REST API and its
//! interaction with the realtime hub.

use axum::{body::Body, http::Request};
use huddle_notify::{create_router, AppState, RoomBridge};
use huddle_pubsub::InProcessBus;
use huddle_realtime::RoomHub;
use huddle_store::MemoryChatLog;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_state() -> AppState {
    let hub = Arc::new(RoomHub::new());
    let bridge = Arc::new(RoomBridge::new(
        Arc::new(InProcessBus::new()),
        Arc::clone(&hub),
    ));
    AppState {
        hub,
        store: Arc::new(MemoryChatLog::new()),
        bridge,
    }
}

fn create_test_app(state: &AppState) -> axum::Router {
    create_router(state.clone(), "http://localhost:5173")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let state = create_test_state();
    let app = create_test_app(&state);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body = json_body(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "notifications");
}

#[tokio::test]
async fn test_send_chat_persists_and_returns_created() {
    let state = create_test_state();
    let app = create_test_app(&state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/chat",
            json!({"room": "global", "user": "Ana", "message": "hola"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let msg = json_body(response).await;
    assert_eq!(msg["room"], "global");
    assert_eq!(msg["user"], "Ana");
    assert_eq!(msg["message"], "hola");
    assert!(msg["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(msg["createdAt"].as_str().is_some());

    // The message is now part of the room transcript.
    let response = app.oneshot(get("/chat/global")).await.unwrap();
    assert_eq!(response.status(), 200);
    let rows = json_body(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["message"], "hola");
}

#[tokio::test]
async fn test_send_chat_rejects_invalid_payload() {
    let state = create_test_state();
    let app = create_test_app(&state);

    let cases = [
        json!({"room": "global", "user": "", "message": "hola"}),
        json!({"room": "", "user": "Ana", "message": "hola"}),
        json!({"room": "global", "user": "Ana", "message": "x".repeat(1001)}),
    ];
    for payload in cases {
        let response = app
            .clone()
            .oneshot(post_json("/chat", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let body = json_body(response).await;
        assert_eq!(body["message"], "invalid payload");
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    // Nothing was persisted.
    let response = app.oneshot(get("/chat/global")).await.unwrap();
    assert!(json_body(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_limit_and_order() {
    let state = create_test_state();
    let app = create_test_app(&state);

    for i in 0..5 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/chat",
                json!({"room": "global", "user": "Ana", "message": format!("m{i}")}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    let response = app.oneshot(get("/chat/global?limit=2")).await.unwrap();
    let rows = json_body(response).await;
    let rows = rows.as_array().unwrap();

    // The two most recent, oldest-first.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["message"], "m3");
    assert_eq!(rows[1]["message"], "m4");
}

#[tokio::test]
async fn test_history_of_unknown_room_is_empty() {
    let state = create_test_state();
    let app = create_test_app(&state);

    let response = app.oneshot(get("/chat/project:nope")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(json_body(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_notify_returns_created_without_persisting() {
    let state = create_test_state();
    let app = create_test_app(&state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/notify",
            json!({"room": "global", "type": "warning", "title": "deploy imminent"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    assert_eq!(json_body(response).await["ok"], true);

    // Notifications never land in the chat log.
    let response = app.oneshot(get("/chat/global")).await.unwrap();
    assert!(json_body(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_notify_rejects_invalid_payload() {
    let state = create_test_state();
    let app = create_test_app(&state);

    let response = app
        .oneshot(post_json(
            "/notify",
            json!({"room": "global", "title": "", "body": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert_eq!(json_body(response).await["message"], "invalid payload");
}

#[tokio::test]
async fn test_rest_send_reaches_realtime_members() {
    let state = create_test_state();
    let app = create_test_app(&state);

    // Simulate a realtime client that joined the room.
    let (client, mut rx) = state.hub.connect().unwrap();
    state.hub.join(&client, "global").unwrap();
    state.bridge.ensure_room("global").await.unwrap();

    let response = app
        .oneshot(post_json(
            "/chat",
            json!({"room": "global", "user": "Ana", "message": "hola"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let raw = rx.try_recv().unwrap();
    assert!(raw.contains("\"chat:new\""));
    assert!(raw.contains("hola"));
}

#[tokio::test]
async fn test_notify_not_observed_after_leave() {
    let state = create_test_state();
    let app = create_test_app(&state);

    let (client, mut rx) = state.hub.connect().unwrap();
    state.hub.join(&client, "project:p1").unwrap();
    state.bridge.ensure_room("project:p1").await.unwrap();

    let outcome = state.hub.leave(&client, "project:p1").unwrap();
    assert!(outcome.room_now_empty);
    state.bridge.release_room("project:p1").await;

    let response = app
        .oneshot(post_json(
            "/notify",
            json!({"room": "project:p1", "title": "task done"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_realtime_stats_endpoint() {
    let state = create_test_state();
    let app = create_test_app(&state);

    let (client, _rx) = state.hub.connect().unwrap();
    state.hub.join(&client, "global").unwrap();

    let response = app.oneshot(get("/realtime/stats")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body = json_body(response).await;
    assert_eq!(body["current_connections"], 1);
    assert_eq!(body["total_joins"], 1);
}
