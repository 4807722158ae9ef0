//! Opt-in score cache for backend calls.
//!
//! [`ScoreCache`] remembers the [`RawScore`] a backend returned for a text,
//! so re-analyzing the same comment (e.g. a page reload) does not repeat a
//! remote call. Only successful scores are stored; failures always reach
//! the backend again.
//!
//! The cache holds raw scores, not categories. A cached score still goes
//! through the backend's thresholds, so a hit classifies exactly like a
//! miss.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use moka::future::Cache;

use crate::telemetry;
use crate::types::RawScore;

/// Configuration for the score cache.
///
/// ```rust
/// # use sentimeter::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(5_000)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// In-memory score cache keyed on (backend, text).
#[derive(Clone)]
pub struct ScoreCache {
    cache: Cache<u64, (f64, f64)>,
}

impl ScoreCache {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// Look up a cached score. Emits cache hit/miss metrics.
    pub async fn get(&self, backend: &str, text: &str) -> Option<RawScore> {
        let key = cache_key(backend, text);
        match self.cache.get(&key).await {
            Some((score, magnitude)) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "backend" => backend.to_string())
                    .increment(1);
                Some(RawScore { score, magnitude })
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "backend" => backend.to_string())
                    .increment(1);
                None
            }
        }
    }

    pub async fn insert(&self, backend: &str, text: &str, raw: RawScore) {
        self.cache
            .insert(cache_key(backend, text), (raw.score, raw.magnitude))
            .await;
    }
}

/// Compute a cache key from backend name and text.
///
/// `DefaultHasher` is deterministic within a process lifetime, which is
/// all an in-memory cache needs.
fn cache_key(backend: &str, text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    backend.hash(&mut hasher);
    text.hash(&mut hasher);
    hasher.finish()
}
