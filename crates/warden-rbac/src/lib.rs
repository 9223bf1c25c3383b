//! # warden-rbac — RBAC2 Constraint Engine
//!
//! Validates proposed role/permission assignment changes against a loaded
//! constraint set: separation-of-duty (mutex) groups, cardinality caps, and
//! prerequisite chains.
//!
//! ## Architecture
//!
//! - **Grants** (`grant.rs`): `GrantRef` (a role or permission reference)
//!   and `AssignmentDelta`, the unit of change a collaborator proposes.
//!
//! - **Constraints** (`constraint.rs`): the four constraint kinds and
//!   `ConstraintSet`, which is validated against the grant universe at load
//!   time and immutable afterwards. Reload is an atomic `Arc` swap performed
//!   by the caller, never an in-place mutation visible to in-flight
//!   evaluations.
//!
//! - **Engine** (`engine.rs`): `validate(current, delta, set) → Decision`.
//!   A pure function — it never mutates its inputs and has no side effects.
//!   Callers apply the delta only after `Allow`, under their own
//!   transactional commit; the decision is correct only against the
//!   snapshot it was given.
//!
//! ## Crate Policy
//!
//! - Violations are values, not errors: a denied assignment is a normal
//!   negative outcome.
//! - Malformed constraint data (dangling references, degenerate groups) is a
//!   fatal configuration error at load time, never at evaluation time.
//! - Deterministic reporting: all constraints are always evaluated, and the
//!   violation list is ordered by constraint ID.

pub mod constraint;
pub mod engine;
pub mod grant;

pub use constraint::{Constraint, ConstraintKind, ConstraintRule, ConstraintSet, GrantUniverse};
pub use engine::{validate, Decision, Violation};
pub use grant::{AssignmentDelta, GrantRef};
