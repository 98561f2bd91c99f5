//! In-memory result cache for built feature collections.
//!
//! ## Cache Key Structure
//! provider : event id : technique
//!
//! ## Eviction Strategy
//! - Entry-count LRU eviction
//! - TTL-based expiration on read (lazy)
//!
//! ## Single-flight
//! Concurrent misses for the same key share one computation: the first
//! caller holds the key's in-flight lock while computing, the others wait on
//! it and then read the stored entry.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use metrics::counter;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use track_protocol::TrackFeatureCollection;

/// Cache key for one pipeline run.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct TrackCacheKey {
    /// Provider name (e.g., "jtwc")
    pub provider: String,
    /// Normalized cyclone id, or a feed-wide key such as "active"
    pub event_id: String,
    /// Forecast aid, uppercased
    pub technique: Option<String>,
}

impl TrackCacheKey {
    pub fn new(
        provider: impl Into<String>,
        event_id: impl Into<String>,
        technique: Option<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            event_id: event_id.into(),
            technique,
        }
    }
}

impl std::fmt::Display for TrackCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.provider,
            self.event_id,
            self.technique.as_deref().unwrap_or("-")
        )
    }
}

struct CachedEntry {
    value: Arc<TrackFeatureCollection>,
    inserted_at: Instant,
}

/// Statistics for the result cache.
#[derive(Default)]
pub struct CacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    /// Entries found past their TTL
    pub expired: AtomicU64,
    /// Callers served by another caller's computation
    pub coalesced: AtomicU64,
}

impl CacheStats {
    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            hit_rate: self.hit_rate(),
        }
    }
}

/// Point-in-time copy of [`CacheStats`] for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub coalesced: u64,
    pub hit_rate: f64,
}

/// TTL + LRU cache of feature collections with per-key single-flight.
pub struct ResultCache {
    entries: RwLock<LruCache<TrackCacheKey, CachedEntry>>,
    in_flight: Mutex<HashMap<TrackCacheKey, Arc<Mutex<()>>>>,
    ttl: Duration,
    stats: CacheStats,
}

impl ResultCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
            ttl,
            stats: CacheStats::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Look up a fresh entry, recording a hit or miss.
    pub async fn get(&self, key: &TrackCacheKey) -> Option<Arc<TrackFeatureCollection>> {
        match self.lookup(key).await {
            Some(value) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                counter!("cyclone_cache_hits_total").increment(1);
                Some(value)
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                counter!("cyclone_cache_misses_total").increment(1);
                None
            }
        }
    }

    /// Store a value, replacing any previous entry for the key.
    pub async fn insert(&self, key: TrackCacheKey, value: Arc<TrackFeatureCollection>) {
        let entry = CachedEntry {
            value,
            inserted_at: Instant::now(),
        };
        self.entries.write().await.put(key, entry);
    }

    /// Return the cached collection for `key`, or run `compute` and cache its
    /// result. Concurrent callers missing on the same key wait for a single
    /// computation. An `Err` is returned as-is and nothing is stored.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &TrackCacheKey,
        compute: F,
    ) -> Result<Arc<TrackFeatureCollection>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TrackFeatureCollection, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let gate = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(
                in_flight
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        let _guard = gate.lock().await;

        if let Some(value) = self.lookup(key).await {
            self.stats.coalesced.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Served by concurrent computation");
            return Ok(value);
        }

        let result = compute().await;

        let outcome = match result {
            Ok(collection) => {
                let value = Arc::new(collection);
                self.insert(key.clone(), Arc::clone(&value)).await;
                Ok(value)
            }
            Err(e) => Err(e),
        };

        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, &gate))
        {
            in_flight.remove(key);
        }

        outcome
    }

    async fn lookup(&self, key: &TrackCacheKey) -> Option<Arc<TrackFeatureCollection>> {
        let mut entries = self.entries.write().await;

        let expired = match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(Arc::clone(&entry.value));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn key(event_id: &str) -> TrackCacheKey {
        TrackCacheKey::new("jtwc", event_id, Some("JTWC".to_string()))
    }

    #[tokio::test]
    async fn test_second_call_is_cached() {
        let cache = ResultCache::new(Duration::from_secs(60), 16);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let result: Result<_, ()> = cache
                .get_or_compute(&key("WP012026"), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(TrackFeatureCollection::new())
                })
                .await;
            assert!(result.is_ok());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits.load(Ordering::Relaxed), 1);
        assert_eq!(cache.stats().misses.load(Ordering::Relaxed), 1);
        assert_eq!(cache.stats().hit_rate(), 50.0);
    }

    #[tokio::test]
    async fn test_errors_are_not_stored() {
        let cache = ResultCache::new(Duration::from_secs(60), 16);

        let failed: Result<_, &str> = cache
            .get_or_compute(&key("WP012026"), || async { Err("boom") })
            .await;
        assert_eq!(failed.unwrap_err(), "boom");
        assert!(cache.is_empty().await);

        let ok: Result<_, &str> = cache
            .get_or_compute(&key("WP012026"), || async { Ok(TrackFeatureCollection::new()) })
            .await;
        assert!(ok.is_ok());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_recomputed() {
        let cache = ResultCache::new(Duration::from_millis(20), 16);
        cache
            .insert(key("WP012026"), Arc::new(TrackFeatureCollection::new()))
            .await;
        assert!(cache.get(&key("WP012026")).await.is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&key("WP012026")).await.is_none());
        assert_eq!(cache.stats().expired.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_lru_bound() {
        let cache = ResultCache::new(Duration::from_secs(60), 2);
        for id in ["AL012026", "AL022026", "AL032026"] {
            cache.insert(key(id), Arc::new(TrackFeatureCollection::new())).await;
        }
        assert_eq!(cache.len().await, 2);
        assert!(cache.get(&key("AL012026")).await.is_none());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(key("WP012026").to_string(), "jtwc:WP012026:JTWC");
        assert_eq!(TrackCacheKey::new("jma", "active", None).to_string(), "jma:active:-");
    }
}
