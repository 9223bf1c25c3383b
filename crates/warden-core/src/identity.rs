//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifier namespaces of the policy engine.
//! You cannot pass a `RoleId` where a `PermissionId` is expected, and a
//! `ConstraintId` can never masquerade as a principal.
//!
//! ## Security Invariant
//!
//! Type-level separation between identifier namespaces prevents
//! cross-namespace confusion, e.g. an attacker substituting a role
//! identifier into a constraint-scope lookup.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a principal (an authenticated user identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub Uuid);

/// Unique identifier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(pub Uuid);

/// Unique identifier for a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionId(pub Uuid);

/// Unique identifier for an RBAC constraint definition.
///
/// `Ord` is derived over the UUID bytes; violation reporting sorts by this
/// ordering so the "lowest constraint ID" contract is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConstraintId(pub Uuid);

macro_rules! uuid_id_impls {
    ($ty:ident, $prefix:literal) => {
        impl $ty {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

uuid_id_impls!(PrincipalId, "principal");
uuid_id_impls!(RoleId, "role");
uuid_id_impls!(PermissionId, "permission");
uuid_id_impls!(ConstraintId, "constraint");
