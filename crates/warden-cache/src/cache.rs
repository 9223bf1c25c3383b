//! # SharedCache Trait
//!
//! The narrow contract between the engine and the deployment-owned shared
//! cache. Values are opaque strings (callers serialize with `serde_json`);
//! keys follow the `warden:<namespace>:<id>` convention established by the
//! crates that own each namespace.

use std::time::Duration;

use async_trait::async_trait;
use warden_core::DependencyError;

/// Async contract for the shared cache.
///
/// Implementations must make `increment` and `swap` atomic: no interleaving
/// with concurrent calls on the same keys may be observable.
#[async_trait]
pub trait SharedCache: Send + Sync {
    /// Fetch the value at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, DependencyError>;

    /// Store `value` at `key`. `ttl = None` means no expiry.
    ///
    /// Overwrites any existing entry, replacing its TTL.
    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), DependencyError>;

    /// Remove the entry at `key`. Returns whether a live entry was removed.
    async fn remove(&self, key: &str) -> Result<bool, DependencyError>;

    /// Atomically increment the counter at `key` and return the new count.
    ///
    /// A missing or expired entry counts from zero, and the entry's TTL is
    /// set to `ttl` only at that first increment — later increments keep the
    /// original window expiry.
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, DependencyError>;

    /// Atomically remove `retire_key` and store `value` at `publish_key`.
    ///
    /// Used for token rotation: at no point are both keys live.
    async fn swap(
        &self,
        retire_key: &str,
        publish_key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), DependencyError>;

    /// Reclaim expired entries. Returns how many were removed.
    ///
    /// Expiry enforcement does not depend on this being called; reads
    /// already treat expired entries as absent.
    async fn purge_expired(&self) -> Result<usize, DependencyError>;
}
