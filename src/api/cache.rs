//! In-memory TTL cache for backend responses
//!
//! Suppresses duplicate network round-trips for identical queries within
//! a short window. Entries are keyed by method + URL + API key, carry a
//! per-entry TTL, and are swept periodically. Errors are never cached.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default TTL when a call site does not specify one
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Sweep interval for expired entries
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(2 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    body: Value,
    expires_at: Instant,
}

/// Cache occupancy statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

/// Thread-safe response cache with per-entry expiry
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        ResponseCache::default()
    }

    /// Cache key covering everything that affects the response
    pub fn key(method: &str, url: &str, api_key: &str) -> String {
        format!("{} {} {}", method, url, api_key)
    }

    /// Get a cached body if present and unexpired. Expired entries are
    /// dropped on read.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a response body under the key for `ttl`
    pub fn insert(&self, key: String, body: Value, ttl: Duration) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                body,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Drop every expired entry
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!(dropped, remaining = entries.len(), "swept response cache");
        }
    }

    /// Drop everything
    pub fn clear(&self) {
        self.entries.lock().expect("cache lock poisoned").clear();
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.lock().expect("cache lock poisoned");
        let valid = entries
            .values()
            .filter(|entry| entry.expires_at > now)
            .count();
        CacheStats {
            total_entries: entries.len(),
            valid_entries: valid,
            expired_entries: entries.len() - valid,
        }
    }
}

/// Spawn the periodic sweeper for a shared cache. The task runs until the
/// cache's last other handle is dropped.
pub fn spawn_sweeper(cache: Arc<ResponseCache>, interval: Duration) -> tokio::task::JoinHandle<()> {
    let cache = Arc::downgrade(&cache);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            match cache.upgrade() {
                Some(cache) => cache.sweep(),
                None => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_within_ttl() {
        let cache = ResponseCache::new();
        let key = ResponseCache::key("GET", "https://api/relationships?search=acme", "k1");
        cache.insert(key.clone(), json!([{"ID": "e-1"}]), Duration::from_secs(60));

        assert_eq!(cache.get(&key), Some(json!([{"ID": "e-1"}])));
    }

    #[test]
    fn test_expired_entry_dropped_on_read() {
        let cache = ResponseCache::new();
        let key = ResponseCache::key("GET", "https://api/relationships?search=acme", "k1");
        cache.insert(key.clone(), json!(1), Duration::from_millis(5));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&key), None);
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_key_includes_api_key() {
        let a = ResponseCache::key("GET", "https://api/x", "key-a");
        let b = ResponseCache::key("GET", "https://api/x", "key-b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_sweep_and_stats() {
        let cache = ResponseCache::new();
        cache.insert("live".to_string(), json!(1), Duration::from_secs(60));
        cache.insert("dead".to_string(), json!(2), Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.valid_entries, 1);
        assert_eq!(stats.expired_entries, 1);

        cache.sweep();
        let stats = cache.stats();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.expired_entries, 0);
    }

    #[test]
    fn test_clear() {
        let cache = ResponseCache::new();
        cache.insert("k".to_string(), json!(1), Duration::from_secs(60));
        cache.clear();
        assert_eq!(cache.stats().total_entries, 0);
    }
}
