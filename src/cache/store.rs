//! Bounded, time-aware embedding store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use super::key::CacheKey;

/// Configuration for [`BoundedCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries held at once. 0 degrades to no-op caching.
    pub max_size: usize,
    /// TTL applied by [`BoundedCache::set`] when no explicit TTL is given.
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 10_000,
            default_ttl: Duration::from_millis(86_400_000),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// Point-in-time occupancy of the cache, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
}

struct CacheEntry {
    vector: Vec<f32>,
    inserted_at: Instant,
    ttl: Duration,
    /// Monotone insertion stamp; smallest = oldest. Breaks `Instant` ties so
    /// eviction order is exact even when inserts land in the same tick.
    seq: u64,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        // A zero TTL is dead on any later read, independent of clock
        // resolution.
        self.ttl.is_zero() || self.inserted_at.elapsed() > self.ttl
    }
}

/// Key→vector store with per-entry expiry and a hard entry-count bound.
///
/// Expiry is lazy: an entry past its TTL is only removed when next looked
/// up, never by a background sweeper. Eviction is by insertion order (the
/// oldest-inserted entry goes first), which is deliberately not an LRU —
/// a hot entry inserted long ago is still the first to go.
///
/// All mutating operations take `&mut self`; callers sharing an instance
/// across tasks serialize access behind a single-writer boundary (mutex or
/// actor) rather than this type locking internally.
pub struct BoundedCache {
    entries: HashMap<CacheKey, CacheEntry>,
    config: CacheConfig,
    next_seq: u64,
}

impl BoundedCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
            next_seq: 0,
        }
    }

    /// Look up `key`, removing it first if its TTL has elapsed.
    pub fn get(&mut self, key: &CacheKey) -> Option<&[f32]> {
        if self.entries.get(key).is_some_and(|e| e.is_expired()) {
            self.entries.remove(key);
            debug!(key = %key, "cache entry expired on read");
            return None;
        }
        self.entries.get(key).map(|e| e.vector.as_slice())
    }

    /// Insert `vector` under `key` with the configured default TTL.
    pub fn set(&mut self, key: CacheKey, vector: Vec<f32>) {
        let ttl = self.config.default_ttl;
        self.set_with_ttl(key, vector, ttl);
    }

    /// Insert `vector` under `key` with an explicit TTL.
    ///
    /// If the key is new and the cache is at capacity, the oldest-inserted
    /// entry is evicted first so the bound holds after every call.
    /// Overwriting an existing key resets its insertion stamp and TTL and
    /// never evicts.
    pub fn set_with_ttl(&mut self, key: CacheKey, vector: Vec<f32>, ttl: Duration) {
        if self.config.max_size == 0 {
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.max_size {
            self.evict_oldest();
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            CacheEntry {
                vector,
                inserted_at: Instant::now(),
                ttl,
                seq,
            },
        );
    }

    /// Current occupancy. Counts entries not yet lazily expired off.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.config.max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.seq)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            debug!(key = %key, "evicted oldest cache entry");
        }
    }
}

impl Default for BoundedCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn key(s: &str) -> CacheKey {
        CacheKey::from_text(s)
    }

    #[test]
    fn test_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_size, 10_000);
        assert_eq!(config.default_ttl, Duration::from_millis(86_400_000));
    }

    #[test]
    fn test_get_after_set_returns_value() {
        let mut cache = BoundedCache::default();
        cache.set(key("a"), vec![1.0, 2.0, 3.0]);
        assert_eq!(cache.get(&key("a")), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(cache.get(&key("b")), None);
    }

    #[test]
    fn test_size_never_exceeds_bound() {
        let config = CacheConfig::new().with_max_size(3);
        let mut cache = BoundedCache::new(config);
        for i in 0..20 {
            cache.set(key(&format!("text-{i}")), vec![i as f32]);
            assert!(cache.len() <= 3, "bound violated after insert {i}");
        }
        assert_eq!(cache.stats().size, 3);
    }

    #[test]
    fn test_eviction_removes_oldest_inserted() {
        let config = CacheConfig::new().with_max_size(2);
        let mut cache = BoundedCache::new(config);
        cache.set(key("first"), vec![1.0]);
        cache.set(key("second"), vec![2.0]);
        // Reading "first" does not refresh it; eviction is by insertion
        // order, not access order.
        assert!(cache.get(&key("first")).is_some());
        cache.set(key("third"), vec![3.0]);
        assert_eq!(cache.get(&key("first")), None);
        assert!(cache.get(&key("second")).is_some());
        assert!(cache.get(&key("third")).is_some());
    }

    #[test]
    fn test_overwrite_resets_insertion_order_without_evicting() {
        let config = CacheConfig::new().with_max_size(2);
        let mut cache = BoundedCache::new(config);
        cache.set(key("a"), vec![1.0]);
        cache.set(key("b"), vec![2.0]);
        // Overwrite "a": now "b" is the oldest.
        cache.set(key("a"), vec![1.5]);
        assert_eq!(cache.len(), 2);
        cache.set(key("c"), vec![3.0]);
        assert_eq!(cache.get(&key("b")), None);
        assert_eq!(cache.get(&key("a")), Some(&[1.5][..]));
    }

    #[test]
    fn test_zero_capacity_degrades_to_noop() {
        let config = CacheConfig::new().with_max_size(0);
        let mut cache = BoundedCache::new(config);
        cache.set(key("a"), vec![1.0]);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&key("a")), None);
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let mut cache = BoundedCache::default();
        cache.set_with_ttl(key("a"), vec![1.0], Duration::from_millis(30));
        assert!(cache.get(&key("a")).is_some());
        thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&key("a")), None);
        // Lazy expiry removed it physically on that read.
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_zero_ttl_expires_on_next_read() {
        let mut cache = BoundedCache::default();
        cache.set_with_ttl(key("a"), vec![1.0], Duration::ZERO);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("a")), None);
    }

    #[test]
    fn test_expired_entries_linger_until_read() {
        let mut cache = BoundedCache::default();
        cache.set_with_ttl(key("a"), vec![1.0], Duration::ZERO);
        cache.set(key("b"), vec![2.0]);
        // "a" is logically dead but physically present until looked up.
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("a")), None);
        assert_eq!(cache.len(), 1);
    }
}
