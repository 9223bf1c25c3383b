//! # warden-auth — Authorization Façade
//!
//! The composition layer collaborators call. Two entry points carry the
//! engine's real invariants:
//!
//! - **Login** — `authenticate_and_issue` runs the state machine
//!   `Unauthenticated → decrypt → lock check → credential verify →
//!   Authenticated → issue session`. Credential mismatch and unknown user
//!   are the same generic failure (no user enumeration); a lock detected
//!   before the credential check short-circuits without consuming a
//!   failure-counter slot, so hammering a locked account cannot extend the
//!   lockout.
//!
//! - **Assignment** — `propose_assignment`/`propose_change` evaluate a
//!   proposed delta against the active constraint set and report
//!   Allow/Deny. The façade never commits the delta; the collaborator that
//!   does is responsible for a transactional commit against the same
//!   snapshot.
//!
//! Collaborator seams (`PrincipalDirectory`, `AssignmentStore`) are explicit
//! trait dependencies injected at construction — in-memory defaults exist
//! for tests and single-node use, not runtime presence-detection.
//!
//! The loaded constraint set is read-only for its lifetime;
//! `reload_constraints` swaps the whole set atomically, and in-flight
//! evaluations keep the snapshot they started with.

pub mod config;
pub mod directory;
pub mod facade;
pub mod store;

pub use config::WardenConfig;
pub use directory::{MemoryDirectory, PrincipalDirectory, PrincipalRecord, PrincipalStatus};
pub use facade::{AssignmentProposal, AuthFailure, AuthorizationFacade, LoginGrant};
pub use store::{AssignmentStore, AssignmentSubject, MemoryAssignmentStore};
