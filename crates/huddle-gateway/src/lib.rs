//! # Huddle Gateway
//!
//! Single public entry point of the Huddle backend.
//!
//! Each request either forwards transparently to exactly one downstream
//! service (projects, tasks, notifications) with the `/api` prefix
//! stripped, or runs an aggregation handler that fans out to several
//! services concurrently:
//!
//! - `GET /api/health` probes all three services with a 2 s cap per probe
//!   and always succeeds, reporting one boolean per service.
//! - `GET /api/stats` merges the projects count and the tasks counters
//!   into one payload, cached for 10 s; any downstream failure fails the
//!   whole request with 502 and leaves the cache untouched.
//!
//! ## Modules
//!
//! - [`routes`] - router assembly
//! - [`aggregate`] - health and stats fan-out handlers
//! - [`proxy`] - transparent forwarding
//! - [`fanout`] - tolerant and strict concurrent joiners
//! - [`cache`] - TTL cache for the stats aggregate
//! - [`config`] - environment-backed configuration
//! - [`error`] - gateway error type and 502 mapping

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod fanout;
pub mod proxy;
pub mod routes;

use std::sync::Arc;

pub use aggregate::StatsAggregate;
pub use cache::StatsCache;
pub use config::{GatewayConfig, Upstreams};
pub use error::GatewayError;
pub use routes::create_router;

/// Shared state of the gateway.
#[derive(Clone)]
pub struct AppState {
    /// Downstream HTTP client, created once and reused for all requests.
    pub http: reqwest::Client,
    /// Downstream base URLs.
    pub upstreams: Upstreams,
    /// Stats aggregate cache.
    pub cache: Arc<StatsCache>,
}

impl AppState {
    /// Create gateway state over the given downstream services.
    pub fn new(upstreams: Upstreams) -> Self {
        Self::with_cache(upstreams, StatsCache::with_default_ttl())
    }

    /// Create gateway state with a specific cache (tests shorten the TTL).
    pub fn with_cache(upstreams: Upstreams, cache: StatsCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            upstreams,
            cache: Arc::new(cache),
        }
    }
}
