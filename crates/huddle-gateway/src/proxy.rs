//! Transparent reverse proxy to a downstream service.

use axum::{
    body::Body,
    extract::Request,
    http::header,
    response::Response,
};
use tracing::debug;

use crate::error::GatewayError;
use crate::AppState;

/// Largest request body the proxy will buffer.
const MAX_PROXY_BODY: usize = 1024 * 1024;

/// Public prefix stripped before forwarding.
const PUBLIC_PREFIX: &str = "/api";

/// Rewrite a public path into the downstream path.
pub(crate) fn rewrite_path(path: &str) -> &str {
    path.strip_prefix(PUBLIC_PREFIX).unwrap_or(path)
}

/// Build the downstream URL for a request.
pub(crate) fn upstream_url(base: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{base}{}?{query}", rewrite_path(path)),
        None => format!("{base}{}", rewrite_path(path)),
    }
}

/// Forward a request verbatim (method, body, query) to `base` with the
/// public prefix stripped, and relay the downstream status and body
/// unchanged. A downstream that cannot be reached surfaces as 502.
pub async fn forward(
    state: &AppState,
    base: &str,
    req: Request,
) -> Result<Response, GatewayError> {
    let url = upstream_url(base, req.uri().path(), req.uri().query());
    let method = req.method().clone();
    let content_type = req.headers().get(header::CONTENT_TYPE).cloned();

    let body = axum::body::to_bytes(req.into_body(), MAX_PROXY_BODY)
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    debug!(method = %method, url = %url, "proxying request");

    let mut upstream_req = state.http.request(method, url);
    if let Some(content_type) = content_type {
        upstream_req = upstream_req.header(header::CONTENT_TYPE, content_type);
    }
    if !body.is_empty() {
        upstream_req = upstream_req.body(body);
    }

    let upstream = upstream_req.send().await?;

    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let bytes = upstream.bytes().await?;

    let mut response = Response::builder().status(status);
    if let Some(content_type) = content_type {
        response = response.header(header::CONTENT_TYPE, content_type);
    }
    response
        .body(Body::from(bytes))
        .map_err(|e| GatewayError::Upstream(e.to_string()))
}
