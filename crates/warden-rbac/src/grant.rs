//! # Grants and Assignment Deltas
//!
//! A grant is an edge in the assignment graph: a role held by a principal,
//! or a permission held by a role. The constraint engine is agnostic to
//! which subject holds the grants — it evaluates the subject's grant set
//! against the constraint scopes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use warden_core::{PermissionId, RoleId};

/// A reference to a grantable element: a role or a permission.
///
/// `Ord` gives deterministic set iteration; roles sort before permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GrantRef {
    /// A role grant.
    Role(RoleId),
    /// A permission grant.
    Permission(PermissionId),
}

impl std::fmt::Display for GrantRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Role(id) => write!(f, "{id}"),
            Self::Permission(id) => write!(f, "{id}"),
        }
    }
}

/// A proposed change to a subject's grant set.
///
/// The engine validates the delta; the collaborator commits it (or not)
/// afterwards. An element in both `add` and `remove` is nonsense;
/// `is_contradictory` exposes the check and validating entry points reject
/// such deltas before evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDelta {
    /// Grants to add.
    pub add: BTreeSet<GrantRef>,
    /// Grants to remove.
    pub remove: BTreeSet<GrantRef>,
}

impl AssignmentDelta {
    /// An empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// A delta that grants a single element.
    pub fn granting(grant: GrantRef) -> Self {
        let mut delta = Self::new();
        delta.add.insert(grant);
        delta
    }

    /// A delta that revokes a single element.
    pub fn revoking(grant: GrantRef) -> Self {
        let mut delta = Self::new();
        delta.remove.insert(grant);
        delta
    }

    /// Add a grant to the delta (builder style).
    pub fn grant(mut self, grant: GrantRef) -> Self {
        self.add.insert(grant);
        self
    }

    /// Add a revocation to the delta (builder style).
    pub fn revoke(mut self, grant: GrantRef) -> Self {
        self.remove.insert(grant);
        self
    }

    /// Whether any element appears in both `add` and `remove`.
    pub fn is_contradictory(&self) -> bool {
        self.add.intersection(&self.remove).next().is_some()
    }

    /// The grant set that would result from applying this delta to `current`.
    ///
    /// Removals apply first, then additions — so a remove-then-add of the
    /// same element within one delta nets to "held".
    pub fn apply_to(&self, current: &BTreeSet<GrantRef>) -> BTreeSet<GrantRef> {
        let mut post: BTreeSet<GrantRef> = current.difference(&self.remove).copied().collect();
        post.extend(self.add.iter().copied());
        post
    }

    /// Every grant the delta touches, added or removed.
    pub fn touched(&self) -> BTreeSet<GrantRef> {
        self.add.union(&self.remove).copied().collect()
    }
}
