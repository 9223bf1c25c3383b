//! # Constraint Evaluation
//!
//! `validate` recomputes, for each constraint whose scope the delta touches,
//! the post-delta grant set restricted to that scope, and checks the rule.
//! Constraints are evaluated independently — all of them, every time — and
//! violations are reported in constraint-ID order, so the first violation is
//! deterministically the lowest ID.
//!
//! The function is pure. It never mutates its inputs and takes no side
//! effects; the caller commits the delta only after receiving `Allow`, under
//! its own compare-and-swap or transaction. Correctness is guaranteed only
//! against the assignment snapshot passed in.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use warden_core::ConstraintId;

use crate::constraint::{ConstraintKind, ConstraintRule, ConstraintSet};
use crate::grant::{AssignmentDelta, GrantRef};

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The violated constraint.
    pub constraint_id: ConstraintId,
    /// Which kind of rule was violated.
    pub kind: ConstraintKind,
    /// Human-readable explanation for administrator UIs.
    pub reason: String,
}

/// The outcome of validating a proposed delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// No constraint is violated post-delta; the caller may commit.
    Allow,
    /// At least one constraint is violated; the delta must not be committed.
    Deny {
        /// All violations, ordered by constraint ID.
        violations: Vec<Violation>,
    },
}

impl Decision {
    /// Whether the decision permits the delta.
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The lowest-ID violation, if any.
    pub fn first_violation(&self) -> Option<&Violation> {
        match self {
            Self::Allow => None,
            Self::Deny { violations } => violations.first(),
        }
    }
}

/// Validate a proposed assignment delta against the constraint set.
///
/// `current` is the subject's grant snapshot; constraints whose scope does
/// not intersect the delta are skipped (they cannot be newly violated by
/// it). Violation is a normal negative result, not an error.
pub fn validate(
    current: &BTreeSet<GrantRef>,
    delta: &AssignmentDelta,
    constraints: &ConstraintSet,
) -> Decision {
    let post = delta.apply_to(current);
    let touched = delta.touched();

    let mut violations = Vec::new();
    for constraint in constraints.iter() {
        if constraint.rule.referenced_grants().is_disjoint(&touched) {
            continue;
        }
        if let Some(reason) = check_rule(&constraint.rule, current, &post) {
            violations.push(Violation {
                constraint_id: constraint.id,
                kind: constraint.rule.kind(),
                reason,
            });
        }
    }

    if violations.is_empty() {
        Decision::Allow
    } else {
        Decision::Deny { violations }
    }
}

/// Check one rule against the pre- and post-delta grant sets.
///
/// Returns `Some(reason)` on violation.
fn check_rule(
    rule: &ConstraintRule,
    current: &BTreeSet<GrantRef>,
    post: &BTreeSet<GrantRef>,
) -> Option<String> {
    match rule {
        ConstraintRule::RoleMutex { group } => {
            let held: Vec<_> = group
                .iter()
                .filter(|r| post.contains(&GrantRef::Role(**r)))
                .collect();
            (held.len() >= 2).then(|| {
                format!(
                    "mutually exclusive roles held together: {}",
                    join_display(&held)
                )
            })
        }
        ConstraintRule::PermMutex { group } => {
            let held: Vec<_> = group
                .iter()
                .filter(|p| post.contains(&GrantRef::Permission(**p)))
                .collect();
            (held.len() >= 2).then(|| {
                format!(
                    "mutually exclusive permissions held together: {}",
                    join_display(&held)
                )
            })
        }
        ConstraintRule::Cardinality { scope, limit } => {
            let held = post.intersection(scope).count();
            (held > *limit as usize).then(|| {
                format!("cardinality limit {limit} exceeded: {held} grants in scope")
            })
        }
        ConstraintRule::Prerequisite {
            dependents,
            required,
        } => {
            // Required grants must exist before or together with a dependent:
            // presence in the pre-delta or post-delta set both satisfy.
            for dependent in dependents.iter().filter(|d| post.contains(d)) {
                if let Some(missing) = required
                    .iter()
                    .find(|r| !current.contains(r) && !post.contains(r))
                {
                    return Some(format!(
                        "grant {dependent} requires {missing}, which is not held"
                    ));
                }
            }
            None
        }
    }
}

fn join_display<T: std::fmt::Display>(items: &[&T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
