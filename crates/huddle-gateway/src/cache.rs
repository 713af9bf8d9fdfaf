//! Short-lived stats cache.

use crate::aggregate::StatsAggregate;
use parking_lot::RwLock;
use std::time::{Duration, Instant};

/// How long an aggregate stays fresh.
pub const STATS_TTL: Duration = Duration::from_secs(10);

struct CacheEntry {
    stored_at: Instant,
    value: StatsAggregate,
}

/// Process-local cache of the last computed stats aggregate.
///
/// Invalidated only by expiry. Racing refreshes overwrite wholesale
/// (last write wins), which is benign since both compute the same value.
pub struct StatsCache {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl StatsCache {
    /// Create a cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Create a cache with the production TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(STATS_TTL)
    }

    /// The cached aggregate, if still fresh.
    pub fn get(&self) -> Option<StatsAggregate> {
        let entry = self.entry.read();
        match entry.as_ref() {
            Some(e) if e.stored_at.elapsed() < self.ttl => Some(e.value.clone()),
            _ => None,
        }
    }

    /// Store a freshly computed aggregate.
    pub fn put(&self, value: StatsAggregate) {
        *self.entry.write() = Some(CacheEntry {
            stored_at: Instant::now(),
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate() -> StatsAggregate {
        StatsAggregate {
            projects: 3,
            tasks: 7,
            todo: 2,
            doing: 1,
            done: 4,
            cached: false,
        }
    }

    #[test]
    fn test_empty_cache_misses() {
        let cache = StatsCache::with_default_ttl();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = StatsCache::with_default_ttl();
        cache.put(aggregate());
        assert_eq!(cache.get().unwrap(), aggregate());
    }

    #[test]
    fn test_expires_after_ttl() {
        let cache = StatsCache::new(Duration::from_millis(10));
        cache.put(aggregate());
        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_put_overwrites_wholesale() {
        let cache = StatsCache::with_default_ttl();
        cache.put(aggregate());

        let mut newer = aggregate();
        newer.projects = 4;
        cache.put(newer.clone());

        assert_eq!(cache.get().unwrap(), newer);
    }
}
