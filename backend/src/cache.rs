//! In-memory key/value cache with per-entry expiry and LRU eviction
//!
//! Used to memoize the access token and historical weather lookups.
//! Expired entries are dropped on read and by [`TtlCache::purge_expired`];
//! once `capacity` is reached the least recently used entry makes room.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Cloneable handle to a shared, bounded TTL cache
#[derive(Debug, Clone)]
pub struct TtlCache<K: Hash + Eq, V> {
    store: Arc<RwLock<LruCache<K, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Capacity used when zero entries are requested
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value for `key`, unless it has expired
    pub async fn get(&self, key: &K) -> Option<V> {
        // LruCache::get updates the recency order, so this needs the write lock
        let mut store = self.store.write().await;
        match store.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            Some(_) => {
                store.pop(key);
                None
            }
            None => None,
        }
    }

    /// Store a value with the cache's default TTL
    pub async fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.ttl).await;
    }

    /// Store a value with an explicit TTL, evicting the least recently used
    /// entry when full
    pub async fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.store
            .write()
            .await
            .push(key, CacheEntry::new(value, ttl));
    }

    pub async fn invalidate(&self, key: &K) {
        self.store.write().await.pop(key);
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut store = self.store.write().await;
        let expired: Vec<K> = store
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            store.pop(key);
        }
        drop(store);

        let removed = expired.len();
        if removed > 0 {
            tracing::debug!(removed, "Purged expired cache entries");
        }
        removed
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}
