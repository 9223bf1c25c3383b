//! # In-Memory Cache
//!
//! A `SharedCache` implementation over a `tokio::sync::RwLock`-guarded map.
//! Suitable for tests and single-node deployments; multi-instance
//! deployments point the engine at a networked cache instead.
//!
//! TTLs are tracked against `tokio::time::Instant`, so tests can drive
//! expiry deterministically with `tokio::time::pause()` / `advance()`.
//!
//! Atomicity: `increment` and `swap` each hold the write lock for their
//! whole read-modify-write, which makes them linearizable across tasks.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use warden_core::DependencyError;

use crate::cache::SharedCache;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// In-memory `SharedCache` implementation.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries. Test and diagnostics helper.
    pub async fn live_len(&self) -> usize {
        let now = Instant::now();
        let guard = self.entries.read().await;
        guard.values().filter(|e| !e.is_expired(now)).count()
    }
}

#[async_trait]
impl SharedCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DependencyError> {
        let now = Instant::now();
        let guard = self.entries.read().await;
        Ok(guard
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), DependencyError> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        let mut guard = self.entries.write().await;
        guard.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DependencyError> {
        let now = Instant::now();
        let mut guard = self.entries.write().await;
        Ok(guard
            .remove(key)
            .is_some_and(|entry| !entry.is_expired(now)))
    }

    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, DependencyError> {
        let now = Instant::now();
        let mut guard = self.entries.write().await;
        let fresh = match guard.get(key) {
            Some(entry) if !entry.is_expired(now) => entry.value.parse::<u64>().unwrap_or(0) + 1,
            _ => 1,
        };
        let expires_at = match guard.get(key) {
            // First increment of a window sets the TTL; later ones keep it.
            Some(entry) if !entry.is_expired(now) => entry.expires_at,
            _ => Some(now + ttl),
        };
        guard.insert(
            key.to_string(),
            Entry {
                value: fresh.to_string(),
                expires_at,
            },
        );
        Ok(fresh)
    }

    async fn swap(
        &self,
        retire_key: &str,
        publish_key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), DependencyError> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        let mut guard = self.entries.write().await;
        guard.remove(retire_key);
        guard.insert(publish_key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, DependencyError> {
        let now = Instant::now();
        let mut guard = self.entries.write().await;
        let before = guard.len();
        guard.retain(|_, entry| !entry.is_expired(now));
        Ok(before - guard.len())
    }
}
