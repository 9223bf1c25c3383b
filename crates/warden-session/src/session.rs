//! # Session Manager
//!
//! Issues, validates, refreshes, and revokes opaque bearer tokens backed by
//! the shared cache.
//!
//! ## Expiry model
//!
//! The session record's `expires_at` is the logical expiry and the lazy
//! check on `validate`/`refresh` is authoritative. The cache entry's TTL is
//! the logical expiry plus a retention grace, so a recently expired token
//! still answers `Expired` (auditable) instead of decaying straight to
//! `NotFound`. `sweep` reclaims entries past retention; a failed sweep is
//! logged and otherwise ignored.
//!
//! ## Rotation
//!
//! Under `RotateAlways`, a refresh mints a new token and retires the old one
//! in a single atomic cache `swap` — there is no window in which both tokens
//! validate, which bounds replay of a captured refresh token.

use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use warden_cache::SharedCache;
use warden_core::{DependencyError, PrincipalId, Timestamp};

/// Typed failure for session operations. Revoked and expired are distinct
/// for auditability; callers must not collapse them.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The token's logical expiry has passed.
    #[error("session expired")]
    Expired,

    /// The session was explicitly revoked before expiry.
    #[error("session revoked")]
    Revoked,

    /// No record exists for the token.
    #[error("session not found")]
    NotFound,

    /// A stored record failed to deserialize.
    #[error("session record corrupt: {0}")]
    Corrupt(String),

    /// The shared cache failed or timed out.
    #[error(transparent)]
    Dependency(#[from] DependencyError),
}

/// Refresh-token rotation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationPolicy {
    /// Every refresh mints a new token and retires the old one.
    RotateAlways,
    /// Refresh extends expiry on the same token.
    RotateNever,
}

/// Session manager configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Session lifetime from issue (and from each refresh).
    pub ttl_secs: u64,
    /// How long an expired record stays answerable as `Expired`.
    pub expired_retention_secs: u64,
    /// Whether refresh rotates the token identifier.
    pub rotation: RotationPolicy,
    /// When set, issuing a session revokes the principal's previous one.
    pub single_session: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60,
            expired_retention_secs: 60 * 60,
            rotation: RotationPolicy::RotateAlways,
            single_session: false,
        }
    }
}

/// An opaque, unguessable bearer token: 32 bytes of OS entropy, hex-encoded.
///
/// `Debug` and `Display` are redacted to a short prefix so tokens never
/// land in logs whole.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a fresh random token.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Wrap an externally presented token string.
    pub fn from_string(raw: String) -> Self {
        Self(raw)
    }

    /// The full token string, for transport to the authenticated client.
    pub fn expose(&self) -> &str {
        &self.0
    }

    // Char-based: externally presented tokens are not guaranteed ASCII.
    fn prefix(&self) -> String {
        self.0.chars().take(8).collect()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken({}…)", self.prefix())
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}…", self.prefix())
    }
}

/// A session record as stored in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The bearer token identifying this session.
    pub token: SessionToken,
    /// The principal the session belongs to.
    pub principal_id: PrincipalId,
    /// When the session was issued.
    pub issued_at: Timestamp,
    /// Logical expiry; always ≥ `issued_at`.
    pub expires_at: Timestamp,
    /// Whether the session has been revoked.
    pub revoked: bool,
}

impl Session {
    /// Whether the logical expiry has passed at `now`.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }
}

/// Cache-backed session manager.
pub struct SessionManager {
    cache: Arc<dyn SharedCache>,
    policy: SessionPolicy,
}

impl SessionManager {
    /// Build a session manager over the shared cache.
    pub fn new(cache: Arc<dyn SharedCache>, policy: SessionPolicy) -> Self {
        Self { cache, policy }
    }

    /// Issue a new session for `principal_id`.
    pub async fn issue(&self, principal_id: PrincipalId) -> Result<Session, SessionError> {
        if self.policy.single_session {
            self.revoke_previous(principal_id).await?;
        }
        let now = Timestamp::now();
        let session = Session {
            token: SessionToken::generate(),
            principal_id,
            issued_at: now,
            expires_at: now.plus_secs(self.policy.ttl_secs),
            revoked: false,
        };
        self.store(&session).await?;
        self.cache
            .put(
                &principal_key(&principal_id),
                session.token.expose().to_string(),
                Some(self.record_ttl()),
            )
            .await?;
        info!(principal = %principal_id, token = %session.token, "session issued");
        Ok(session)
    }

    /// Resolve a token to its owning principal.
    ///
    /// The lazy expiry check here is authoritative regardless of sweep
    /// behavior. Expired, revoked, and unknown are distinct outcomes.
    pub async fn validate(&self, token: &SessionToken) -> Result<PrincipalId, SessionError> {
        let session = self.fetch(token).await?;
        if session.revoked {
            return Err(SessionError::Revoked);
        }
        if session.is_expired_at(&Timestamp::now()) {
            return Err(SessionError::Expired);
        }
        Ok(session.principal_id)
    }

    /// Extend a live session, rotating the token per policy.
    pub async fn refresh(&self, token: &SessionToken) -> Result<Session, SessionError> {
        let mut session = self.fetch(token).await?;
        if session.revoked {
            return Err(SessionError::Revoked);
        }
        if session.is_expired_at(&Timestamp::now()) {
            return Err(SessionError::Expired);
        }

        session.expires_at = Timestamp::now().plus_secs(self.policy.ttl_secs);
        match self.policy.rotation {
            RotationPolicy::RotateNever => {
                self.store(&session).await?;
            }
            RotationPolicy::RotateAlways => {
                let old_key = session_key(token);
                session.token = SessionToken::generate();
                let value = self.encode(&session)?;
                // One atomic step: the old token stops validating exactly
                // when the new one starts.
                self.cache
                    .swap(&old_key, &session_key(&session.token), value, Some(self.record_ttl()))
                    .await?;
                self.cache
                    .put(
                        &principal_key(&session.principal_id),
                        session.token.expose().to_string(),
                        Some(self.record_ttl()),
                    )
                    .await?;
            }
        }
        debug!(principal = %session.principal_id, token = %session.token, "session refreshed");
        Ok(session)
    }

    /// Revoke a session in place. Idempotent; unknown tokens are a no-op.
    pub async fn revoke(&self, token: &SessionToken) -> Result<(), SessionError> {
        let mut session = match self.fetch(token).await {
            Ok(session) => session,
            Err(SessionError::NotFound) => return Ok(()),
            Err(other) => return Err(other),
        };
        if session.revoked {
            return Ok(());
        }
        session.revoked = true;
        // Keep the record until natural expiry + retention so validation
        // answers Revoked, not NotFound.
        self.store(&session).await?;
        info!(principal = %session.principal_id, token = %session.token, "session revoked");
        Ok(())
    }

    /// Reclaim cache entries past retention. Best-effort: the lazy check on
    /// `validate` remains authoritative, so a failed sweep only delays
    /// reclamation.
    pub async fn sweep(&self) -> usize {
        match self.cache.purge_expired().await {
            Ok(reclaimed) => {
                debug!(reclaimed, "session sweep complete");
                reclaimed
            }
            Err(err) => {
                warn!(error = %err, "session sweep failed; lazy expiry still enforced");
                0
            }
        }
    }

    async fn fetch(&self, token: &SessionToken) -> Result<Session, SessionError> {
        let raw = self
            .cache
            .get(&session_key(token))
            .await?
            .ok_or(SessionError::NotFound)?;
        serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt(e.to_string()))
    }

    async fn store(&self, session: &Session) -> Result<(), SessionError> {
        let value = self.encode(session)?;
        self.cache
            .put(&session_key(&session.token), value, Some(self.record_ttl()))
            .await?;
        Ok(())
    }

    fn encode(&self, session: &Session) -> Result<String, SessionError> {
        serde_json::to_string(session).map_err(|e| SessionError::Corrupt(e.to_string()))
    }

    fn record_ttl(&self) -> Duration {
        Duration::from_secs(self.policy.ttl_secs + self.policy.expired_retention_secs)
    }

    async fn revoke_previous(&self, principal_id: PrincipalId) -> Result<(), SessionError> {
        let Some(raw) = self.cache.get(&principal_key(&principal_id)).await? else {
            return Ok(());
        };
        let previous = SessionToken::from_string(raw);
        self.revoke(&previous).await
    }
}

fn session_key(token: &SessionToken) -> String {
    format!("warden:session:{}", token.expose())
}

fn principal_key(principal_id: &PrincipalId) -> String {
    format!("warden:principal:{principal_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_cache::MemoryCache;

    fn manager(policy: SessionPolicy) -> SessionManager {
        SessionManager::new(Arc::new(MemoryCache::new()), policy)
    }

    #[tokio::test]
    async fn test_issue_then_validate_roundtrip() {
        let m = manager(SessionPolicy::default());
        let principal = PrincipalId::new();
        let session = m.issue(principal).await.unwrap();
        assert!(!session.expires_at.is_before(&session.issued_at));
        assert_eq!(m.validate(&session.token).await.unwrap(), principal);
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let m = manager(SessionPolicy::default());
        let result = m.validate(&SessionToken::generate()).await;
        assert!(matches!(result, Err(SessionError::NotFound)));
    }

    #[tokio::test]
    async fn test_zero_ttl_session_is_expired() {
        let m = manager(SessionPolicy {
            ttl_secs: 0,
            ..Default::default()
        });
        let session = m.issue(PrincipalId::new()).await.unwrap();
        assert!(matches!(
            m.validate(&session.token).await,
            Err(SessionError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_revoked_before_expiry_answers_revoked() {
        let m = manager(SessionPolicy::default());
        let session = m.issue(PrincipalId::new()).await.unwrap();
        m.revoke(&session.token).await.unwrap();
        assert!(matches!(
            m.validate(&session.token).await,
            Err(SessionError::Revoked)
        ));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent_and_tolerates_unknown() {
        let m = manager(SessionPolicy::default());
        let session = m.issue(PrincipalId::new()).await.unwrap();
        m.revoke(&session.token).await.unwrap();
        m.revoke(&session.token).await.unwrap();
        m.revoke(&SessionToken::generate()).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_retires_old_token() {
        let m = manager(SessionPolicy {
            rotation: RotationPolicy::RotateAlways,
            ..Default::default()
        });
        let principal = PrincipalId::new();
        let session = m.issue(principal).await.unwrap();
        let refreshed = m.refresh(&session.token).await.unwrap();

        assert_ne!(refreshed.token, session.token);
        assert_eq!(m.validate(&refreshed.token).await.unwrap(), principal);
        assert!(matches!(
            m.validate(&session.token).await,
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_refresh_without_rotation_keeps_token() {
        let m = manager(SessionPolicy {
            rotation: RotationPolicy::RotateNever,
            ..Default::default()
        });
        let session = m.issue(PrincipalId::new()).await.unwrap();
        let refreshed = m.refresh(&session.token).await.unwrap();
        assert_eq!(refreshed.token, session.token);
        assert!(m.validate(&session.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_of_revoked_session_fails_revoked() {
        let m = manager(SessionPolicy::default());
        let session = m.issue(PrincipalId::new()).await.unwrap();
        m.revoke(&session.token).await.unwrap();
        assert!(matches!(
            m.refresh(&session.token).await,
            Err(SessionError::Revoked)
        ));
    }

    #[tokio::test]
    async fn test_refresh_of_expired_session_fails_expired() {
        let m = manager(SessionPolicy {
            ttl_secs: 0,
            ..Default::default()
        });
        let session = m.issue(PrincipalId::new()).await.unwrap();
        assert!(matches!(
            m.refresh(&session.token).await,
            Err(SessionError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_single_session_revokes_previous() {
        let m = manager(SessionPolicy {
            single_session: true,
            ..Default::default()
        });
        let principal = PrincipalId::new();
        let first = m.issue(principal).await.unwrap();
        let second = m.issue(principal).await.unwrap();

        assert!(matches!(
            m.validate(&first.token).await,
            Err(SessionError::Revoked)
        ));
        assert_eq!(m.validate(&second.token).await.unwrap(), principal);
    }

    #[tokio::test]
    async fn test_concurrent_sessions_allowed_by_default() {
        let m = manager(SessionPolicy::default());
        let principal = PrincipalId::new();
        let first = m.issue(principal).await.unwrap();
        let second = m.issue(principal).await.unwrap();
        assert!(m.validate(&first.token).await.is_ok());
        assert!(m.validate(&second.token).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_reclaims_after_retention() {
        let cache = Arc::new(MemoryCache::new());
        let m = SessionManager::new(
            cache.clone(),
            SessionPolicy {
                ttl_secs: 10,
                expired_retention_secs: 10,
                ..Default::default()
            },
        );
        let _session = m.issue(PrincipalId::new()).await.unwrap();
        tokio::time::advance(Duration::from_secs(21)).await;
        assert!(m.sweep().await >= 1);
    }

    #[tokio::test]
    async fn test_tokens_are_unique_and_opaque() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_ne!(a, b);
        assert_eq!(a.expose().len(), 64);
        assert!(a.expose().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_token_debug_and_display_are_redacted() {
        let token = SessionToken::generate();
        let debug = format!("{token:?}");
        let display = format!("{token}");
        assert!(!debug.contains(token.expose()));
        assert!(!display.contains(token.expose()));
    }

    #[tokio::test]
    async fn test_multibyte_presented_token_formats_without_panic() {
        // An attacker controls presented token bytes; redaction must not
        // assume the 8th byte is a char boundary.
        let token = SessionToken::from_string("电话电话电话电话电话".to_string());
        let debug = format!("{token:?}");
        assert!(debug.starts_with("SessionToken("));
        let _ = format!("{token}");
    }
}
