//! # Authorization Façade
//!
//! Composes the vault, throttle, session manager, constraint engine, and
//! masking policy behind the two operations collaborators actually call:
//! the login state machine and advisory assignment validation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use warden_cache::{BoundedCache, SharedCache};
use warden_core::{DependencyError, PrincipalId, Timestamp, WardenError};
use warden_mask::{MaskScene, MaskingPolicy};
use warden_rbac::{AssignmentDelta, ConstraintSet, Decision, GrantRef};
use warden_session::{LoginThrottle, SessionError, SessionManager, SessionToken};
use warden_vault::{CredentialVault, VaultError};

use crate::config::WardenConfig;
use crate::directory::{PrincipalDirectory, PrincipalRecord, PrincipalStatus};
use crate::store::{AssignmentStore, AssignmentSubject};

// ─────────────────────────── outcomes ───────────────────────────

/// Why a login attempt did not produce a session.
#[derive(Error, Debug)]
pub enum AuthFailure {
    /// Unknown username or wrong password. Deliberately a single variant:
    /// callers (and attackers) cannot tell the two apart.
    #[error("invalid credentials")]
    InvalidCredential,

    /// The principal is locked out; `retry_at` is when the cooldown ends,
    /// when known.
    #[error("account locked")]
    Locked {
        /// End of the cooldown, if the lock marker carried one.
        retry_at: Option<Timestamp>,
    },

    /// The submitted ciphertext could not be decrypted.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// The cache or a collaborator store failed; the attempt was not
    /// counted either way.
    #[error(transparent)]
    Dependency(#[from] DependencyError),
}

/// A successful login: the bearer token and its logical expiry.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: SessionToken,
    pub principal_id: PrincipalId,
    pub expires_at: Timestamp,
}

/// A single proposed assignment, the common collaborator request shape.
/// Arbitrary deltas go through [`AuthorizationFacade::propose_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentProposal {
    /// Grant `role` to `principal`.
    Role {
        principal: PrincipalId,
        role: warden_core::RoleId,
    },
    /// Grant `permission` to `role`.
    Permission {
        role: warden_core::RoleId,
        permission: warden_core::PermissionId,
    },
}

impl AssignmentProposal {
    fn subject(&self) -> AssignmentSubject {
        match self {
            Self::Role { principal, .. } => AssignmentSubject::Principal(*principal),
            Self::Permission { role, .. } => AssignmentSubject::Role(*role),
        }
    }

    fn delta(&self) -> AssignmentDelta {
        match self {
            Self::Role { role, .. } => AssignmentDelta::granting(GrantRef::Role(*role)),
            Self::Permission { permission, .. } => {
                AssignmentDelta::granting(GrantRef::Permission(*permission))
            }
        }
    }
}

// ─────────────────────────── façade ───────────────────────────

/// The engine's composition root.
///
/// Construction is fail-fast: vault key material is parsed and probed, the
/// constraint set has already been validated by [`ConstraintSet::load`].
pub struct AuthorizationFacade {
    vault: CredentialVault,
    throttle: LoginThrottle,
    sessions: SessionManager,
    masking: MaskingPolicy,
    directory: Arc<dyn PrincipalDirectory>,
    assignments: Arc<dyn AssignmentStore>,
    constraints: RwLock<Arc<ConstraintSet>>,
    store_timeout: Duration,
}

impl AuthorizationFacade {
    /// Wire the engine together over a shared cache and the collaborator
    /// seams. Every cache call the façade issues goes through a
    /// [`BoundedCache`] with the configured dependency timeout.
    pub fn new(
        config: WardenConfig,
        cache: Arc<dyn SharedCache>,
        directory: Arc<dyn PrincipalDirectory>,
        assignments: Arc<dyn AssignmentStore>,
        constraints: ConstraintSet,
    ) -> Result<Self, warden_core::ConfigError> {
        let vault = CredentialVault::from_config(&config.vault)?;
        let timeout = Duration::from_secs(config.dependency_timeout_secs);
        let bounded: Arc<dyn SharedCache> = Arc::new(BoundedCache::new(cache, timeout));
        Ok(Self {
            vault,
            throttle: LoginThrottle::new(Arc::clone(&bounded), config.throttle),
            sessions: SessionManager::new(bounded, config.session),
            masking: config.masking,
            directory,
            assignments,
            constraints: RwLock::new(Arc::new(constraints)),
            store_timeout: timeout,
        })
    }

    // ─────────────────────────── login ───────────────────────────

    /// Run the login state machine: decrypt the submitted password, check
    /// the lockout, verify the credential, and on success issue a session.
    ///
    /// Ordering invariants:
    /// - the lock check runs before the credential check, and a locked
    ///   principal short-circuits without touching the failure counter;
    /// - failures against an unknown username are recorded under the
    ///   presented username, so probing runs into the same throttle.
    pub async fn authenticate_and_issue(
        &self,
        username: &str,
        encrypted_password: &str,
    ) -> Result<LoginGrant, AuthFailure> {
        let plaintext = self.vault.decrypt(encrypted_password)?;
        let password = String::from_utf8(plaintext).map_err(|_| {
            VaultError::InvalidCiphertext("decrypted payload is not UTF-8".into())
        })?;

        if self.throttle.is_locked(username).await? {
            let retry_at = self.throttle.locked_until(username).await?;
            debug!(username, "login rejected, principal locked");
            return Err(AuthFailure::Locked { retry_at });
        }

        let record = self.lookup_principal(username).await?;
        let verified = match &record {
            Some(record) => record.credential.verify(&password),
            // Unknown user: no hash to check, but the failure still counts.
            None => false,
        };

        if !verified {
            let count = self.throttle.record_failure(username).await?;
            debug!(username, count, "credential check failed");
            return Err(AuthFailure::InvalidCredential);
        }

        // record is Some here: verify() can only succeed against a record.
        let Some(record) = record else {
            return Err(AuthFailure::InvalidCredential);
        };
        if record.status == PrincipalStatus::Locked {
            debug!(username, "login rejected, principal administratively locked");
            return Err(AuthFailure::Locked { retry_at: None });
        }

        self.throttle.reset(username).await?;
        let session = self.sessions.issue(record.id).await.map_err(flatten_session)?;
        info!(username, principal = %record.id, "login succeeded");
        Ok(LoginGrant {
            token: session.token,
            principal_id: record.id,
            expires_at: session.expires_at,
        })
    }

    /// Resolve a bearer token to its principal.
    pub async fn validate_session(&self, token: &SessionToken) -> Result<PrincipalId, SessionError> {
        self.sessions.validate(token).await
    }

    /// Extend a session per the rotation policy; returns the grant the
    /// caller must use from now on.
    pub async fn refresh_session(&self, token: &SessionToken) -> Result<LoginGrant, SessionError> {
        let session = self.sessions.refresh(token).await?;
        Ok(LoginGrant {
            token: session.token,
            principal_id: session.principal_id,
            expires_at: session.expires_at,
        })
    }

    /// Revoke a session immediately. Idempotent.
    pub async fn revoke_session(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.sessions.revoke(token).await
    }

    // ─────────────────────── assignment validation ───────────────────────

    /// Validate a single proposed assignment. Advisory: a returned
    /// [`Decision::Allow`] authorizes the collaborator to commit, nothing
    /// is written here.
    pub async fn propose_assignment(
        &self,
        proposal: AssignmentProposal,
    ) -> Result<Decision, WardenError> {
        self.propose_change(proposal.subject(), &proposal.delta())
            .await
    }

    /// Validate an arbitrary delta against the subject's current grants
    /// and the active constraint set.
    pub async fn propose_change(
        &self,
        subject: AssignmentSubject,
        delta: &AssignmentDelta,
    ) -> Result<Decision, WardenError> {
        if delta.is_contradictory() {
            return Err(WardenError::Validation(
                "delta adds and removes the same grant".into(),
            ));
        }

        let current = self.fetch_grants(subject).await?;
        // Snapshot: a concurrent reload does not affect this evaluation.
        let constraints = Arc::clone(&*self.constraints.read().await);
        let decision = warden_rbac::validate(&current, delta, &constraints);
        if let Decision::Deny { violations } = &decision {
            debug!(?subject, count = violations.len(), "assignment denied");
        }
        Ok(decision)
    }

    async fn lookup_principal(
        &self,
        username: &str,
    ) -> Result<Option<PrincipalRecord>, DependencyError> {
        match tokio::time::timeout(self.store_timeout, self.directory.find_by_username(username))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(username, "principal directory timed out");
                Err(DependencyError::Timeout {
                    dependency: "principal-directory",
                    timeout_secs: self.store_timeout.as_secs(),
                })
            }
        }
    }

    async fn fetch_grants(
        &self,
        subject: AssignmentSubject,
    ) -> Result<BTreeSet<GrantRef>, DependencyError> {
        match tokio::time::timeout(self.store_timeout, self.assignments.grants_for(subject)).await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(?subject, "assignment store timed out");
                Err(DependencyError::Timeout {
                    dependency: "assignment-store",
                    timeout_secs: self.store_timeout.as_secs(),
                })
            }
        }
    }

    /// Swap in a new constraint set atomically. In-flight evaluations keep
    /// the snapshot they started with; the next evaluation sees the new set.
    pub async fn reload_constraints(&self, constraints: ConstraintSet) {
        let mut guard = self.constraints.write().await;
        *guard = Arc::new(constraints);
        info!(count = guard.len(), "constraint set reloaded");
    }

    // ─────────────────────────── masking ───────────────────────────

    /// Shape a response payload for the given viewer context.
    pub fn mask_for_response(
        &self,
        payload: &BTreeMap<String, String>,
        viewer_privileged: bool,
        scene: MaskScene,
    ) -> BTreeMap<String, String> {
        self.masking.mask_fields(payload, viewer_privileged, scene)
    }

    // ─────────────────────────── accessors ───────────────────────────

    /// The login throttle, for lockout inspection.
    pub fn throttle(&self) -> &LoginThrottle {
        &self.throttle
    }

    /// The session manager, for sweep scheduling.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// The vault, so co-located callers can encrypt for themselves in tests.
    pub fn vault(&self) -> &CredentialVault {
        &self.vault
    }
}

fn flatten_session(err: SessionError) -> AuthFailure {
    match err {
        SessionError::Dependency(dep) => AuthFailure::Dependency(dep),
        // issue() only fails on cache errors; anything else is a corrupt
        // record surfaced as an unavailable dependency.
        other => AuthFailure::Dependency(DependencyError::Unavailable {
            dependency: "session-store",
            detail: other.to_string(),
        }),
    }
}
