//! Gateway router: aggregation routes plus pure reverse-proxy routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    response::Response,
    routing::{any, get},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::aggregate;
use crate::error::GatewayError;
use crate::proxy::forward;
use crate::AppState;

/// Create the gateway router.
///
/// `/api/health` and `/api/stats` are aggregation handlers; every other
/// route forwards verbatim to exactly one downstream service. The nested
/// `/api/projects/{id}/tasks` route belongs to the tasks service and must
/// win over the projects wildcard.
pub fn create_router(state: AppState, client_origin: &str) -> Router {
    Router::new()
        .route("/api/health", get(aggregate::health))
        .route("/api/stats", get(aggregate::stats))
        .route("/api/projects/{id}/tasks", any(proxy_project_tasks))
        .route("/api/projects", any(proxy_projects))
        .route("/api/projects/{*rest}", any(proxy_projects))
        .route("/api/tasks", any(proxy_tasks))
        .route("/api/tasks/{*rest}", any(proxy_tasks))
        .route("/api/chat", any(proxy_chat))
        .route("/api/chat/{*rest}", any(proxy_chat))
        .route("/api/notify", any(proxy_notify))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(client_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);
    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(origin = %origin, "invalid client origin, cross-origin requests disabled");
            layer
        }
    }
}

async fn proxy_projects(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, GatewayError> {
    let base = state.upstreams.projects.clone();
    forward(&state, &base, req).await
}

async fn proxy_tasks(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, GatewayError> {
    let base = state.upstreams.tasks.clone();
    forward(&state, &base, req).await
}

/// Per-project task listing/creation lives on the tasks service even
/// though the public path sits under `/api/projects`.
async fn proxy_project_tasks(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, GatewayError> {
    let base = state.upstreams.tasks.clone();
    forward(&state, &base, req).await
}

async fn proxy_chat(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, GatewayError> {
    let base = state.upstreams.notifications.clone();
    forward(&state, &base, req).await
}

async fn proxy_notify(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, GatewayError> {
    let base = state.upstreams.notifications.clone();
    forward(&state, &base, req).await
}
