//! Gateway configuration.

use std::net::SocketAddr;

/// Base URLs of the downstream services.
#[derive(Debug, Clone)]
pub struct Upstreams {
    /// Projects CRUD service.
    pub projects: String,
    /// Tasks CRUD service.
    pub tasks: String,
    /// Notifications/chat service.
    pub notifications: String,
}

impl Default for Upstreams {
    fn default() -> Self {
        Self {
            projects: "http://localhost:3001".to_string(),
            tasks: "http://localhost:3002".to_string(),
            notifications: "http://localhost:3003".to_string(),
        }
    }
}

/// Configuration for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Downstream service base URLs.
    pub upstreams: Upstreams,
    /// Allowed client origin for CORS.
    pub client_origin: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3000".parse().expect("valid default addr"),
            upstreams: Upstreams::default(),
            client_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `GATEWAY_ADDR`, `PROJECTS_URL`, `TASKS_URL`,
    /// `NOTIFY_URL`, `CLIENT_ORIGIN`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(addr) = read("GATEWAY_ADDR").and_then(|v| v.parse().ok()) {
            cfg.addr = addr;
        }
        if let Some(url) = read("PROJECTS_URL") {
            cfg.upstreams.projects = normalize(url);
        }
        if let Some(url) = read("TASKS_URL") {
            cfg.upstreams.tasks = normalize(url);
        }
        if let Some(url) = read("NOTIFY_URL") {
            cfg.upstreams.notifications = normalize(url);
        }
        if let Some(origin) = read("CLIENT_ORIGIN") {
            cfg.client_origin = origin;
        }
        cfg
    }
}

fn read(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Base URLs are joined with absolute paths; a trailing slash would
/// produce `//` in every forwarded URL.
fn normalize(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GatewayConfig::default();
        assert_eq!(cfg.addr.port(), 3000);
        assert_eq!(cfg.upstreams.projects, "http://localhost:3001");
        assert_eq!(cfg.upstreams.tasks, "http://localhost:3002");
        assert_eq!(cfg.upstreams.notifications, "http://localhost:3003");
    }

    #[test]
    fn test_normalize_strips_trailing_slash() {
        assert_eq!(
            normalize("http://tasks:3002/".to_string()),
            "http://tasks:3002"
        );
        assert_eq!(
            normalize("http://tasks:3002".to_string()),
            "http://tasks:3002"
        );
    }
}
