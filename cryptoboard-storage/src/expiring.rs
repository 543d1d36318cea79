//! Time-to-live cache layered over a [`KeyValueStore`].
//!
//! Every entry is stored as a JSON object `{"timestamp": <ms>, "value": <json>}`.
//! Reads fail closed: an entry older than the TTL is deleted and reported
//! absent, and so is any entry that no longer parses.

use std::sync::RwLock;

use cryptoboard_core::{Clock, Millis, StorageError, DEFAULT_CACHE_TTL_MS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::KeyValueStore;

/// One cached payload and the moment it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: Millis,
    #[serde(alias = "data")]
    pub value: Value,
}

impl CacheEntry {
    /// Age at `now`, or `None` when the stored timestamp lies in the future
    /// or is too far in the past to subtract.
    pub fn age_at(&self, now: Millis) -> Option<Millis> {
        now.checked_sub(self.timestamp).filter(|age| *age >= 0)
    }

    /// Expired once the age is strictly greater than `ttl`. An entry whose
    /// age cannot be computed counts as expired.
    pub fn is_expired(&self, now: Millis, ttl: Millis) -> bool {
        self.age_at(now).map_or(true, |age| age > ttl)
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads that returned a live entry.
    pub hits: u64,
    /// Reads that found nothing, or found an expired or corrupt entry.
    pub misses: u64,
    /// Entries deleted on read because they outlived the TTL.
    pub expirations: u64,
    /// Successful writes.
    pub writes: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Expiring cache of JSON payloads.
///
/// # Example
///
/// ```ignore
/// let cache = ExpiringCache::new(MemoryStore::new(), SystemClock);
/// cache.set("Global_Data", &payload)?;
/// assert_eq!(cache.get("Global_Data")?, Some(payload));
/// ```
pub struct ExpiringCache<S, C> {
    store: S,
    clock: C,
    ttl_ms: Millis,
    stats: RwLock<CacheStats>,
}

impl<S: KeyValueStore, C: Clock> ExpiringCache<S, C> {
    /// Create a cache with the default five minute TTL.
    pub fn new(store: S, clock: C) -> Self {
        Self::with_ttl(store, clock, DEFAULT_CACHE_TTL_MS)
    }

    pub fn with_ttl(store: S, clock: C, ttl_ms: Millis) -> Self {
        Self {
            store,
            clock,
            ttl_ms,
            stats: RwLock::new(CacheStats::default()),
        }
    }

    pub fn ttl_ms(&self) -> Millis {
        self.ttl_ms
    }

    /// The underlying store, for callers that keep non-expiring values
    /// (such as the theme preference) next to cached payloads.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Look up `key`, returning the payload only if it is still live.
    pub fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            self.record(|s| s.misses += 1);
            return Ok(None);
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding corrupt cache entry");
                self.store.remove(key)?;
                self.record(|s| s.misses += 1);
                return Ok(None);
            }
        };

        let now = self.clock.now_ms();
        if entry.is_expired(now, self.ttl_ms) {
            tracing::debug!(key, timestamp = entry.timestamp, now, ttl_ms = self.ttl_ms, "cache entry expired");
            self.store.remove(key)?;
            self.record(|s| {
                s.misses += 1;
                s.expirations += 1;
            });
            return Ok(None);
        }

        self.record(|s| s.hits += 1);
        Ok(Some(entry.value))
    }

    /// Store `value` under `key`, stamped with the current time.
    pub fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let entry = CacheEntry {
            timestamp: self.clock.now_ms(),
            value: value.clone(),
        };
        let raw = serde_json::to_string(&entry).map_err(|e| StorageError::Serialization {
            reason: e.to_string(),
        })?;
        self.store.set(key, &raw)?;
        self.record(|s| s.writes += 1);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(key)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().map(|s| *s).unwrap_or_default()
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct StepClock(AtomicI64);

    impl StepClock {
        fn advance(&self, ms: Millis) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for StepClock {
        fn now_ms(&self) -> Millis {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn cache() -> (ExpiringCache<MemoryStore, Arc<StepClock>>, Arc<StepClock>) {
        let clock = Arc::new(StepClock::default());
        clock.advance(1_700_000_000_000);
        (ExpiringCache::new(MemoryStore::new(), clock.clone()), clock)
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let (cache, _clock) = cache();
        cache.set("Global_Data", &json!({"data": 1})).unwrap();
        assert_eq!(cache.get("Global_Data").unwrap(), Some(json!({"data": 1})));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().writes, 1);
    }

    #[test]
    fn test_entry_at_exactly_ttl_is_live() {
        let (cache, clock) = cache();
        cache.set("k", &json!(1)).unwrap();
        clock.advance(DEFAULT_CACHE_TTL_MS);
        assert_eq!(cache.get("k").unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_expired_entry_is_removed() {
        let (cache, clock) = cache();
        cache.set("k", &json!(1)).unwrap();
        clock.advance(DEFAULT_CACHE_TTL_MS + 1);

        assert_eq!(cache.get("k").unwrap(), None);
        assert_eq!(cache.store().get("k").unwrap(), None);

        let stats = cache.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_overwrite_restamps_entry() {
        let (cache, clock) = cache();
        cache.set("k", &json!("old")).unwrap();
        clock.advance(DEFAULT_CACHE_TTL_MS);
        cache.set("k", &json!("new")).unwrap();
        clock.advance(10);
        assert_eq!(cache.get("k").unwrap(), Some(json!("new")));
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let (cache, _clock) = cache();
        cache.store().set("k", "not json").unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
        assert_eq!(cache.store().get("k").unwrap(), None);
    }

    #[test]
    fn test_stored_shape_has_timestamp_and_value() {
        let (cache, clock) = cache();
        cache.set("Crypto_Data", &json!([1, 2])).unwrap();
        let raw = cache.store().get("Crypto_Data").unwrap().unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["timestamp"], json!(clock.now_ms()));
        assert_eq!(parsed["value"], json!([1, 2]));
    }

    #[test]
    fn test_legacy_data_field_is_accepted() {
        let (cache, clock) = cache();
        let raw = format!("{{\"timestamp\":{},\"data\":[3]}}", clock.now_ms());
        cache.store().set("k", &raw).unwrap();
        assert_eq!(cache.get("k").unwrap(), Some(json!([3])));
    }

    #[test]
    fn test_extreme_past_timestamp_is_expired() {
        let (cache, _clock) = cache();
        cache
            .store()
            .set("k", "{\"timestamp\":-9223372036854775808,\"value\":1}")
            .unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
        assert_eq!(cache.store().get("k").unwrap(), None);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_future_timestamp_is_expired() {
        let (cache, _clock) = cache();
        cache
            .store()
            .set("k", "{\"timestamp\":9000000000000000,\"value\":1}")
            .unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
        assert_eq!(cache.store().get("k").unwrap(), None);
    }

    #[test]
    fn test_age_at() {
        let entry = CacheEntry {
            timestamp: 1_000,
            value: json!(null),
        };
        assert_eq!(entry.age_at(1_500), Some(500));
        assert_eq!(entry.age_at(999), None);
        assert!(entry.is_expired(999, DEFAULT_CACHE_TTL_MS));
        assert!(!entry.is_expired(1_000 + DEFAULT_CACHE_TTL_MS, DEFAULT_CACHE_TTL_MS));
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.8).abs() < 0.001);
        assert!((CacheStats::default().hit_rate() - 0.0).abs() < 0.001);
    }
}
