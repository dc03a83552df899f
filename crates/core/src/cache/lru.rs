//! Bounded LRU map with write-time TTL.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::Duration;

use crate::Error;
use crate::clock::{Clock, SystemClock};

/// Default number of resident entries.
pub const DEFAULT_CAPACITY: usize = 100;

/// Largest accepted capacity. Recency updates scan the order list, so
/// `get` and `put` are O(capacity).
pub const MAX_CAPACITY: usize = 10_000;

/// Default time-to-live (30 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Cache sizing and expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction.
    pub capacity: usize,
    /// Maximum age of an entry, measured from its last write.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY, ttl: DEFAULT_TTL }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    cached_at_millis: i64,
}

/// In-memory key/value cache with LRU eviction and TTL expiry.
///
/// - `get` refreshes recency but never the timestamp; an entry older than
///   the TTL is dropped on read.
/// - `put` of a new key at capacity evicts the least recently used key,
///   whether or not it has expired.
/// - Re-putting a resident key refreshes both recency and timestamp and never
///   evicts.
///
/// Not synchronized. Hosts sharing one instance across tasks wrap it in a
/// single mutex.
pub struct ExpiringLruCache<K, V, C = SystemClock> {
    capacity: usize,
    ttl_millis: i64,
    entries: HashMap<K, CacheEntry<V>>,
    recency: VecDeque<K>,
    clock: C,
}

impl<K, V> ExpiringLruCache<K, V, SystemClock>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Create a cache with the given config on the system clock.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `capacity` is 0 or above
    /// [`MAX_CAPACITY`].
    pub fn new(config: CacheConfig) -> Result<Self, Error> {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> ExpiringLruCache<K, V, C>
where
    K: Clone + Eq + Hash,
    V: Clone,
    C: Clock,
{
    /// Create a cache driven by an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `capacity` is 0 or above
    /// [`MAX_CAPACITY`].
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self, Error> {
        if config.capacity == 0 {
            return Err(Error::InvalidConfig("cache capacity must be greater than 0".into()));
        }
        if config.capacity > MAX_CAPACITY {
            return Err(Error::InvalidConfig(format!("cache capacity must not exceed {MAX_CAPACITY}")));
        }
        let ttl_millis = i64::try_from(config.ttl.as_millis())
            .map_err(|_| Error::InvalidConfig("cache ttl is out of range".into()))?;

        Ok(Self {
            capacity: config.capacity,
            ttl_millis,
            entries: HashMap::with_capacity(config.capacity),
            recency: VecDeque::with_capacity(config.capacity),
            clock,
        })
    }

    /// Look up a key, dropping it if it has outlived the TTL.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let cached_at = self.entries.get(key)?.cached_at_millis;

        if self.clock.now_millis() - cached_at > self.ttl_millis {
            self.remove(key);
            return None;
        }

        self.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or replace a value, evicting the LRU key when a new key would
    /// exceed capacity.
    pub fn put(&mut self, key: K, value: V) {
        if !self.entries.contains_key(&key)
            && self.entries.len() >= self.capacity
            && let Some(lru) = self.recency.pop_front()
        {
            self.entries.remove(&lru);
        }

        let entry = CacheEntry { value, cached_at_millis: self.clock.now_millis() };
        self.entries.insert(key.clone(), entry);
        self.detach(&key);
        self.recency.push_back(key);
    }

    /// Remove a key if present.
    pub fn remove(&mut self, key: &K) {
        if self.entries.remove(key).is_some() {
            self.detach(key);
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis.unsigned_abs())
    }

    /// Whether `key` is resident, without touching recency or expiring it.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn touch(&mut self, key: &K) {
        self.detach(key);
        self.recency.push_back(key.clone());
    }

    /// Linear in the number of resident keys.
    fn detach(&mut self, key: &K) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            self.recency.remove(pos);
        }
    }
}

impl<K, V, C> std::fmt::Debug for ExpiringLruCache<K, V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringLruCache")
            .field("capacity", &self.capacity)
            .field("ttl_millis", &self.ttl_millis)
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn cache(capacity: usize, ttl: Duration) -> (ExpiringLruCache<String, u32, ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let cache = ExpiringLruCache::with_clock(CacheConfig { capacity, ttl }, clock.clone()).unwrap();
        (cache, clock)
    }

    fn key(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 100);
        assert_eq!(config.ttl, Duration::from_secs(1800));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result: Result<ExpiringLruCache<String, u32>, _> =
            ExpiringLruCache::new(CacheConfig { capacity: 0, ..Default::default() });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_capacity_above_max_rejected() {
        let result: Result<ExpiringLruCache<String, u32>, _> =
            ExpiringLruCache::new(CacheConfig { capacity: MAX_CAPACITY + 1, ..Default::default() });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result: Result<ExpiringLruCache<String, u32>, _> =
            ExpiringLruCache::new(CacheConfig { capacity: MAX_CAPACITY, ..Default::default() });
        assert!(result.is_ok());
    }

    #[test]
    fn test_put_then_get() {
        let (mut cache, _clock) = cache(3, DEFAULT_TTL);
        cache.put(key("a"), 1);
        assert_eq!(cache.get(&key("a")), Some(1));
        assert_eq!(cache.get(&key("missing")), None);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let (mut cache, _clock) = cache(3, DEFAULT_TTL);
        for i in 0..10 {
            cache.put(format!("k{i}"), i);
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
        assert!(cache.contains_key(&key("k7")));
        assert!(cache.contains_key(&key("k8")));
        assert!(cache.contains_key(&key("k9")));
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let (mut cache, _clock) = cache(3, DEFAULT_TTL);
        cache.put(key("a"), 1);
        cache.put(key("b"), 2);
        cache.put(key("c"), 3);

        // `a` becomes most recent, so `b` is now the LRU key.
        assert_eq!(cache.get(&key("a")), Some(1));
        cache.put(key("d"), 4);

        assert!(!cache.contains_key(&key("b")));
        assert!(cache.contains_key(&key("a")));
        assert!(cache.contains_key(&key("c")));
        assert!(cache.contains_key(&key("d")));

        // Order is now c, a, d.
        cache.put(key("e"), 5);
        assert!(!cache.contains_key(&key("c")));
    }

    #[test]
    fn test_reput_does_not_evict() {
        let (mut cache, _clock) = cache(2, DEFAULT_TTL);
        cache.put(key("a"), 1);
        cache.put(key("b"), 2);
        cache.put(key("a"), 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("a")), Some(10));
        assert_eq!(cache.get(&key("b")), Some(2));
    }

    #[test]
    fn test_reput_refreshes_recency() {
        let (mut cache, _clock) = cache(2, DEFAULT_TTL);
        cache.put(key("a"), 1);
        cache.put(key("b"), 2);
        cache.put(key("a"), 3);
        cache.put(key("c"), 4);

        assert!(!cache.contains_key(&key("b")));
        assert!(cache.contains_key(&key("a")));
    }

    #[test]
    fn test_expired_entry_removed_on_read() {
        let (mut cache, clock) = cache(3, Duration::from_millis(1_000));
        cache.put(key("a"), 1);

        clock.advance(1_000);
        assert_eq!(cache.get(&key("a")), Some(1), "exactly ttl old is still fresh");

        clock.advance(1);
        assert_eq!(cache.get(&key("a")), None);
        assert!(!cache.contains_key(&key("a")));
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&key("a")), None);
    }

    #[test]
    fn test_get_does_not_refresh_timestamp() {
        let (mut cache, clock) = cache(3, Duration::from_millis(1_000));
        cache.put(key("a"), 1);

        clock.advance(600);
        assert_eq!(cache.get(&key("a")), Some(1));
        clock.advance(600);
        assert_eq!(cache.get(&key("a")), None);
    }

    #[test]
    fn test_put_refreshes_timestamp() {
        let (mut cache, clock) = cache(3, Duration::from_millis(1_000));
        cache.put(key("a"), 1);
        clock.advance(900);
        cache.put(key("a"), 2);
        clock.advance(900);
        assert_eq!(cache.get(&key("a")), Some(2));
    }

    #[test]
    fn test_eviction_ignores_expiry_state() {
        let (mut cache, clock) = cache(2, Duration::from_millis(100));
        cache.put(key("old"), 1);
        clock.advance(50);
        cache.put(key("fresh"), 2);
        clock.advance(500);

        // Both are expired, but only the LRU key goes on overflow.
        cache.put(key("new"), 3);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_key(&key("old")));
        assert!(cache.contains_key(&key("fresh")));
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut cache, _clock) = cache(3, DEFAULT_TTL);
        cache.put(key("a"), 1);
        cache.put(key("b"), 2);

        cache.remove(&key("a"));
        cache.remove(&key("nope"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("a")), None);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key("b")), None);

        // Recency must be empty too, or the next overflow would evict a ghost.
        cache.put(key("x"), 1);
        cache.put(key("y"), 2);
        cache.put(key("z"), 3);
        cache.put(key("w"), 4);
        assert!(!cache.contains_key(&key("x")));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_accessors() {
        let (cache, _clock) = cache(7, Duration::from_secs(60));
        assert_eq!(cache.capacity(), 7);
        assert_eq!(cache.ttl(), Duration::from_secs(60));
        assert!(cache.is_empty());
    }
}
