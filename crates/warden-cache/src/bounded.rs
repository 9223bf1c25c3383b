//! # Timeout-Bounded Cache Decorator
//!
//! Wraps any `SharedCache` so every call is bounded by a configured timeout.
//! A call that outlives the bound surfaces as `DependencyError::Timeout`,
//! which callers can distinguish from a transport failure — a timed-out
//! throttle increment must never be silently treated as "not locked".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;
use warden_core::DependencyError;

use crate::cache::SharedCache;

/// A `SharedCache` decorator that applies a per-call timeout.
pub struct BoundedCache {
    inner: Arc<dyn SharedCache>,
    timeout: Duration,
}

impl BoundedCache {
    /// Wrap `inner` so every call is bounded by `timeout`.
    pub fn new(inner: Arc<dyn SharedCache>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl std::future::Future<Output = Result<T, DependencyError>> + Send,
    ) -> Result<T, DependencyError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(op, timeout_secs = self.timeout.as_secs(), "cache call timed out");
                Err(DependencyError::Timeout {
                    dependency: "cache",
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

#[async_trait]
impl SharedCache for BoundedCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DependencyError> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), DependencyError> {
        self.bounded("put", self.inner.put(key, value, ttl)).await
    }

    async fn remove(&self, key: &str) -> Result<bool, DependencyError> {
        self.bounded("remove", self.inner.remove(key)).await
    }

    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, DependencyError> {
        self.bounded("increment", self.inner.increment(key, ttl)).await
    }

    async fn swap(
        &self,
        retire_key: &str,
        publish_key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), DependencyError> {
        self.bounded("swap", self.inner.swap(retire_key, publish_key, value, ttl))
            .await
    }

    async fn purge_expired(&self) -> Result<usize, DependencyError> {
        self.bounded("purge_expired", self.inner.purge_expired()).await
    }
}
