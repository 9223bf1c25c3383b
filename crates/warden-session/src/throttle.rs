//! # Login Throttle
//!
//! Tracks consecutive authentication failures per principal key and derives
//! lock state from the cache. The counter uses the cache's atomic
//! increment-and-fetch, so concurrent failed attempts from the same
//! principal never under-count — there is no check-then-increment race that
//! could let an attacker slip under the threshold.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use warden_cache::SharedCache;
use warden_core::{DependencyError, Timestamp};

/// Throttle policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Window in which consecutive failures accumulate.
    pub window_secs: u64,
    /// Failure count that triggers a lock.
    pub threshold: u64,
    /// Lock duration once the threshold is reached, independent of the window.
    pub cooldown_secs: u64,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            threshold: 5,
            cooldown_secs: 30 * 60,
        }
    }
}

/// Cache-backed login failure throttle.
pub struct LoginThrottle {
    cache: Arc<dyn SharedCache>,
    policy: ThrottlePolicy,
}

impl LoginThrottle {
    /// Build a throttle over the shared cache.
    pub fn new(cache: Arc<dyn SharedCache>, policy: ThrottlePolicy) -> Self {
        Self { cache, policy }
    }

    /// Record one authentication failure; returns the current count.
    ///
    /// Reaching the threshold writes a lock-until marker with the cooldown
    /// TTL. Callers check [`LoginThrottle::is_locked`] *before* the
    /// credential check, so an attempt against a locked principal never
    /// reaches this method and never extends the lockout.
    pub async fn record_failure(&self, principal_key: &str) -> Result<u64, DependencyError> {
        let count = self
            .cache
            .increment(
                &counter_key(principal_key),
                Duration::from_secs(self.policy.window_secs),
            )
            .await?;
        if count >= self.policy.threshold {
            let until = Timestamp::now().plus_secs(self.policy.cooldown_secs);
            self.cache
                .put(
                    &lock_key(principal_key),
                    until.to_rfc3339z(),
                    Some(Duration::from_secs(self.policy.cooldown_secs)),
                )
                .await?;
            info!(principal_key, count, %until, "login threshold reached, principal locked");
        }
        Ok(count)
    }

    /// Clear the failure counter after a successful login.
    pub async fn reset(&self, principal_key: &str) -> Result<(), DependencyError> {
        self.cache.remove(&counter_key(principal_key)).await?;
        Ok(())
    }

    /// Whether the principal is currently locked out.
    ///
    /// Recomputed from the cache on every call; the lock marker expiring
    /// (cooldown elapsed) is exactly what unlocks the principal.
    pub async fn is_locked(&self, principal_key: &str) -> Result<bool, DependencyError> {
        Ok(self.cache.get(&lock_key(principal_key)).await?.is_some())
    }

    /// When the current lock expires, if the principal is locked.
    pub async fn locked_until(
        &self,
        principal_key: &str,
    ) -> Result<Option<Timestamp>, DependencyError> {
        let Some(raw) = self.cache.get(&lock_key(principal_key)).await? else {
            return Ok(None);
        };
        Ok(Timestamp::parse(&raw).ok())
    }

    /// Current failure count inside the active window.
    pub async fn failure_count(&self, principal_key: &str) -> Result<u64, DependencyError> {
        Ok(self
            .cache
            .get(&counter_key(principal_key))
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }
}

fn counter_key(principal_key: &str) -> String {
    format!("warden:throttle:{principal_key}")
}

fn lock_key(principal_key: &str) -> String {
    format!("warden:lock:{principal_key}")
}
