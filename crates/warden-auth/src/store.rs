//! # Assignment Store Seam
//!
//! Read access to the collaborator-owned assignment tables. The engine is
//! advisory: the façade fetches a subject's current grants, validates a
//! proposed delta, and returns the decision. Committing an approved delta
//! stays with the collaborator.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use warden_core::{DependencyError, PrincipalId, RoleId};
use warden_rbac::{AssignmentDelta, GrantRef};

/// The holder of a grant set: a principal (role assignments) or a role
/// (permission assignments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssignmentSubject {
    Principal(PrincipalId),
    Role(RoleId),
}

/// Read access to current grant sets.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// The subject's current grants. A subject with no assignments yields
    /// an empty set, not an error.
    async fn grants_for(
        &self,
        subject: AssignmentSubject,
    ) -> Result<BTreeSet<GrantRef>, DependencyError>;
}

/// In-memory store for tests and single-node deployments.
#[derive(Default)]
pub struct MemoryAssignmentStore {
    grants: RwLock<HashMap<AssignmentSubject, BTreeSet<GrantRef>>>,
}

impl MemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a subject's grant set wholesale.
    pub async fn set_grants(&self, subject: AssignmentSubject, grants: BTreeSet<GrantRef>) {
        let mut guard = self.grants.write().await;
        guard.insert(subject, grants);
    }

    /// Commit an approved delta: removals first, then additions.
    pub async fn apply(&self, subject: AssignmentSubject, delta: &AssignmentDelta) {
        let mut guard = self.grants.write().await;
        let current = guard.entry(subject).or_default();
        *current = delta.apply_to(current);
    }
}

#[async_trait]
impl AssignmentStore for MemoryAssignmentStore {
    async fn grants_for(
        &self,
        subject: AssignmentSubject,
    ) -> Result<BTreeSet<GrantRef>, DependencyError> {
        let guard = self.grants.read().await;
        Ok(guard.get(&subject).cloned().unwrap_or_default())
    }
}
