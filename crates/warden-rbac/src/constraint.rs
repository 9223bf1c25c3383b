//! # Constraint Definitions
//!
//! The four RBAC2 constraint kinds and the `ConstraintSet` loader.
//!
//! Constraints are authored out-of-band (a collaborator-owned store) and are
//! read-only to the engine. `ConstraintSet::load` is the single entry point;
//! it cross-checks every reference against the declared grant universe and
//! rejects degenerate definitions so evaluation never has to handle them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use warden_core::{ConfigError, ConstraintId, PermissionId, RoleId};

use crate::grant::GrantRef;

/// Discriminant for reporting which kind of constraint was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Mutually exclusive roles (separation of duty).
    RoleMutex,
    /// Mutually exclusive permissions.
    PermMutex,
    /// Cap on how many grants from a scope may be held.
    Cardinality,
    /// A grant that requires other grants to already be held.
    Prerequisite,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::RoleMutex => "ROLE_MUTEX",
            Self::PermMutex => "PERM_MUTEX",
            Self::Cardinality => "CARDINALITY",
            Self::Prerequisite => "PREREQUISITE",
        };
        f.write_str(s)
    }
}

/// The rule body of a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintRule {
    /// At most one role from `group` may be held simultaneously.
    RoleMutex {
        /// The mutually exclusive role group (≥ 2 members).
        group: BTreeSet<RoleId>,
    },
    /// At most one permission from `group` may be held simultaneously.
    PermMutex {
        /// The mutually exclusive permission group (≥ 2 members).
        group: BTreeSet<PermissionId>,
    },
    /// At most `limit` grants from `scope` may be held simultaneously.
    Cardinality {
        /// The capped grant scope.
        scope: BTreeSet<GrantRef>,
        /// Maximum number of held grants from the scope.
        limit: u32,
    },
    /// Holding any grant in `dependents` requires holding all of `required`.
    Prerequisite {
        /// The dependent grants.
        dependents: BTreeSet<GrantRef>,
        /// The grants that must exist before (or together with) a dependent.
        required: BTreeSet<GrantRef>,
    },
}

impl ConstraintRule {
    /// The reporting kind of this rule.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::RoleMutex { .. } => ConstraintKind::RoleMutex,
            Self::PermMutex { .. } => ConstraintKind::PermMutex,
            Self::Cardinality { .. } => ConstraintKind::Cardinality,
            Self::Prerequisite { .. } => ConstraintKind::Prerequisite,
        }
    }

    /// Every grant the rule references, as `GrantRef`s.
    pub fn referenced_grants(&self) -> BTreeSet<GrantRef> {
        match self {
            Self::RoleMutex { group } => group.iter().map(|r| GrantRef::Role(*r)).collect(),
            Self::PermMutex { group } => {
                group.iter().map(|p| GrantRef::Permission(*p)).collect()
            }
            Self::Cardinality { scope, .. } => scope.clone(),
            Self::Prerequisite {
                dependents,
                required,
            } => dependents.union(required).copied().collect(),
        }
    }
}

/// A constraint definition: a stable identifier plus a rule body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Stable identifier; violation reports are ordered by it.
    pub id: ConstraintId,
    /// The rule body.
    pub rule: ConstraintRule,
}

/// The universe of grants a constraint set may reference.
///
/// Supplied by the collaborator that owns role/permission definitions.
#[derive(Debug, Clone, Default)]
pub struct GrantUniverse {
    /// All known role identifiers.
    pub roles: BTreeSet<RoleId>,
    /// All known permission identifiers.
    pub permissions: BTreeSet<PermissionId>,
}

impl GrantUniverse {
    fn contains(&self, grant: &GrantRef) -> bool {
        match grant {
            GrantRef::Role(id) => self.roles.contains(id),
            GrantRef::Permission(id) => self.permissions.contains(id),
        }
    }
}

/// An immutable, load-time-validated set of constraints.
///
/// Iteration order is constraint-ID order, which makes violation reporting
/// deterministic. Reload replaces the whole set behind an `Arc` swap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    constraints: BTreeMap<ConstraintId, Constraint>,
}

impl ConstraintSet {
    /// Validate and load a constraint set against the grant universe.
    ///
    /// # Errors
    ///
    /// Fatal `ConfigError` when:
    /// - a constraint references a role/permission absent from `universe`
    ///   (dangling reference);
    /// - two constraints share an ID;
    /// - a mutex group has fewer than two members;
    /// - a prerequisite has an empty dependent or required set, or a grant
    ///   that depends on itself.
    pub fn load(
        constraints: Vec<Constraint>,
        universe: &GrantUniverse,
    ) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for constraint in constraints {
            for grant in constraint.rule.referenced_grants() {
                if !universe.contains(&grant) {
                    return Err(ConfigError::DanglingReference {
                        constraint_id: constraint.id.to_string(),
                        grant: grant.to_string(),
                    });
                }
            }
            match &constraint.rule {
                ConstraintRule::RoleMutex { group } if group.len() < 2 => {
                    return Err(ConfigError::Invalid {
                        key: constraint.id.to_string(),
                        detail: "mutex group needs at least two members".into(),
                    });
                }
                ConstraintRule::PermMutex { group } if group.len() < 2 => {
                    return Err(ConfigError::Invalid {
                        key: constraint.id.to_string(),
                        detail: "mutex group needs at least two members".into(),
                    });
                }
                ConstraintRule::Prerequisite {
                    dependents,
                    required,
                } => {
                    if dependents.is_empty() || required.is_empty() {
                        return Err(ConfigError::Invalid {
                            key: constraint.id.to_string(),
                            detail: "prerequisite needs non-empty dependent and required sets"
                                .into(),
                        });
                    }
                    if let Some(grant) = dependents.intersection(required).next() {
                        return Err(ConfigError::Invalid {
                            key: constraint.id.to_string(),
                            detail: format!("grant {grant} cannot be its own prerequisite"),
                        });
                    }
                }
                _ => {}
            }
            if map.insert(constraint.id, constraint.clone()).is_some() {
                return Err(ConfigError::Invalid {
                    key: constraint.id.to_string(),
                    detail: "duplicate constraint id".into(),
                });
            }
        }
        Ok(Self { constraints: map })
    }

    /// Iterate constraints in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    /// Number of loaded constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Look up a constraint by ID.
    pub fn get(&self, id: &ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id)
    }
}
