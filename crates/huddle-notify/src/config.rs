//! Service configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the notifications service.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Redis connection string; absence selects the in-process bus.
    pub redis_url: Option<String>,
    /// Chat log directory; absence selects the in-memory store.
    pub store_path: Option<PathBuf>,
    /// Allowed client origin for CORS and WebSocket connections.
    pub client_origin: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3003".parse().expect("valid default addr"),
            redis_url: None,
            store_path: None,
            client_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl NotifyConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `NOTIFY_ADDR`, `REDIS_URL`, `STORE_PATH`,
    /// `CLIENT_ORIGIN`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(addr) = read("NOTIFY_ADDR").and_then(|v| v.parse().ok()) {
            cfg.addr = addr;
        }
        cfg.redis_url = read("REDIS_URL");
        cfg.store_path = read("STORE_PATH").map(PathBuf::from);
        if let Some(origin) = read("CLIENT_ORIGIN") {
            cfg.client_origin = origin;
        }
        cfg
    }
}

fn read(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = NotifyConfig::default();
        assert_eq!(cfg.addr.port(), 3003);
        assert!(cfg.redis_url.is_none());
        assert!(cfg.store_path.is_none());
        assert_eq!(cfg.client_origin, "http://localhost:5173");
    }
}
