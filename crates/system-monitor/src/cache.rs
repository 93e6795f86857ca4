//! In-memory TTL cache with lazy expiry on read and a periodic background sweep.
//!
//! Every entry carries an absolute expiry instant. A read that finds an expired
//! entry reports a miss and evicts it; entries that are written but never read
//! again are reclaimed by the sweeper task started with [`TtlCache::spawn_sweeper`].
//!
//! Reads (`get`, `keys`, `size`) take the shared lock. Writes and the sweep
//! take the exclusive lock, so no caller ever sees a half-written entry.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::task::JoinHandle;

/// How often the background sweeper scans for expired entries.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

type EntryMap<V> = HashMap<String, CacheEntry<V>>;

/// Shared, lock-guarded key → value store with per-entry TTL.
///
/// Cloning the cache clones the handle, not the contents.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Arc<RwLock<EntryMap<V>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache. No sweeper runs until [`spawn_sweeper`](Self::spawn_sweeper).
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries
            .write()
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Look up a live entry.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_with_ttl(key).map(|(value, _)| value)
    }

    /// Look up a live entry together with the time left before it expires.
    pub fn get_with_ttl(&self, key: &str) -> Option<(V, Duration)> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            let entry = entries.get(key)?;
            if !entry.is_expired_at(now) {
                return Some((entry.value.clone(), entry.expires_at - now));
            }
        }
        self.evict_if_expired(key);
        None
    }

    /// Remove `key` if present.
    pub fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn size(&self) -> usize {
        self.entries.read().len()
    }

    /// Snapshot of stored keys. Order is unspecified.
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Drop every expired entry now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        purge_expired(&self.entries)
    }

    // The read guard is released before this runs. A concurrent `set` may have
    // replaced the entry in between, so expiry is re-checked under the write lock.
    fn evict_if_expired(&self, key: &str) {
        let mut entries = self.entries.write();
        if entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(Instant::now()))
        {
            entries.remove(key);
        }
    }
}

impl<V: Send + Sync + 'static> TtlCache<V> {
    /// Start the periodic sweep on the current tokio runtime.
    ///
    /// The task stops when the returned handle is dropped or when every clone
    /// of the cache has been dropped.
    pub fn spawn_sweeper(&self, interval: Duration) -> SweepHandle {
        let entries: Weak<RwLock<EntryMap<V>>> = Arc::downgrade(&self.entries);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(entries) = entries.upgrade() else {
                    tracing::debug!("Cache dropped, stopping sweeper");
                    break;
                };
                let removed = purge_expired(&entries);
                if removed > 0 {
                    tracing::debug!("Swept {removed} expired cache entries");
                }
            }
        });

        SweepHandle { task }
    }
}

fn purge_expired<V>(entries: &RwLock<EntryMap<V>>) -> usize {
    let now = Instant::now();
    let mut entries = entries.write();
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired_at(now));
    before - entries.len()
}

/// Owns the background sweep task; aborts it on drop.
#[derive(Debug)]
pub struct SweepHandle {
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Stop the sweeper explicitly.
    pub fn stop(self) {
        drop(self);
    }

    /// Whether the sweep task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_millis(20);

    #[test]
    fn test_set_then_get() {
        let cache = TtlCache::new();
        cache.set("k", 42u32, Duration::from_secs(10));
        assert_eq!(cache.get("k"), Some(42));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_missing_key() {
        let cache: TtlCache<u32> = TtlCache::new();
        assert_eq!(cache.get("nope"), None);
        assert!(cache.get_with_ttl("nope").is_none());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = TtlCache::new();
        cache.set("k", "v".to_string(), SHORT);
        std::thread::sleep(SHORT * 3);

        assert_eq!(cache.size(), 1, "expired entries linger until touched");
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.size(), 0, "lazy expiry removes the entry");
    }

    #[test]
    fn test_get_with_ttl_reports_remaining_time() {
        let cache = TtlCache::new();
        cache.set("k", 1u8, Duration::from_secs(30));
        let (value, remaining) = cache.get_with_ttl("k").unwrap();
        assert_eq!(value, 1);
        assert!(remaining <= Duration::from_secs(30));
        assert!(remaining > Duration::from_secs(29));
    }

    #[test]
    fn test_overwrite_replaces_value_and_expiry() {
        let cache = TtlCache::new();
        cache.set("k", 1u8, SHORT);
        cache.set("k", 2u8, Duration::from_secs(60));
        std::thread::sleep(SHORT * 3);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_delete_clear_keys() {
        let cache = TtlCache::new();
        cache.set("a", 1u8, Duration::from_secs(60));
        cache.set("b", 2u8, Duration::from_secs(60));
        cache.set("c", 3u8, Duration::from_secs(60));

        cache.delete("b");
        cache.delete("missing");
        let mut keys = cache.keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "c".to_string()]);

        cache.clear();
        assert_eq!(cache.size(), 0);
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let cache = TtlCache::new();
        cache.set("old", 1u8, SHORT);
        cache.set("fresh", 2u8, Duration::from_secs(60));
        std::thread::sleep(SHORT * 3);

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.keys(), vec!["fresh".to_string()]);
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = TtlCache::new();
        let other = cache.clone();
        other.set("k", 7u8, Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(7));
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let cache: TtlCache<usize> = TtlCache::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("{t}-{i}");
                        cache.set(key.clone(), i, Duration::from_secs(60));
                        assert_eq!(cache.get(&key), Some(i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.size(), 800);
    }

    #[tokio::test]
    async fn test_sweeper_removes_unread_entries() {
        let cache = TtlCache::new();
        let _sweeper = cache.spawn_sweeper(SHORT);
        cache.set("k", 1u8, Duration::from_millis(5));

        tokio::time::sleep(SHORT * 10).await;
        assert_eq!(cache.size(), 0, "sweeper should reclaim the entry without a read");
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_sweeper() {
        let cache = TtlCache::new();
        let sweeper = cache.spawn_sweeper(Duration::from_secs(3600));
        sweeper.stop();

        cache.set("k", 1u8, Duration::from_millis(1));
        tokio::time::sleep(SHORT).await;
        assert_eq!(cache.size(), 1, "no sweep after stop");
    }

    #[tokio::test]
    async fn test_sweeper_exits_when_cache_dropped() {
        let cache: TtlCache<u8> = TtlCache::new();
        let sweeper = cache.spawn_sweeper(Duration::from_millis(5));
        drop(cache);

        tokio::time::sleep(SHORT * 5).await;
        assert!(sweeper.is_finished());
    }
}
