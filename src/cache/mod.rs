//! Key-value cache used by the cache-aside likes counter.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait CacheService: Send + Sync {
    /// Returns the cached value for `key`.
    /// Returns Ok(None) on a miss or when the entry expired.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` with the cache's default TTL.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`, succeeding whether or not it was present.
    fn delete(&self, key: &str) -> Result<()>;
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-process TTL cache.
pub struct MemoryCache {
    default_ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drops every expired entry.
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, entry| entry.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheService for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: Instant::now() + self.default_ttl,
        };
        self.entries.lock().unwrap().insert(key.to_string(), entry);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
