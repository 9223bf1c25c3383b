//! # warden-core — Foundational Types for the Warden Policy Engine
//!
//! This crate is the leaf of the Warden workspace DAG. It defines the
//! type-system primitives every other crate builds on: identifier newtypes,
//! UTC-only timestamps, the shared error taxonomy, and credential hashing.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `PrincipalId`, `RoleId`,
//!    `PermissionId`, `ConstraintId` — all newtypes over `Uuid`. No bare
//!    strings or bare UUIDs for identifiers, so a role can never be passed
//!    where a permission is expected.
//!
//! 2. **One error taxonomy.** Every component contract returns typed results
//!    classified as validation failure, policy denial, dependency failure, or
//!    configuration failure. Expected business outcomes (a denied assignment,
//!    a locked account) are values, never panics.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with
//!    seconds precision. Session expiry arithmetic never touches local time.
//!
//! 4. **Secrets never serialize.** `CredentialHash` exposes no plaintext and
//!    verification is constant-time.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `warden-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public value types derive `Debug`, `Clone`, `Serialize`, `Deserialize`.

pub mod credential;
pub mod error;
pub mod identity;
pub mod temporal;

pub use credential::CredentialHash;
pub use error::{ConfigError, DependencyError, WardenError};
pub use identity::{ConstraintId, PermissionId, PrincipalId, RoleId};
pub use temporal::Timestamp;
