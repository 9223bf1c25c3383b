//! # warden-session — Session & Credential Lifecycle
//!
//! Two stateful components, both backed by the shared cache:
//!
//! - **Login Throttle** (`throttle.rs`): consecutive-failure counters in a
//!   fixed window; reaching the threshold locks the principal for a cooldown
//!   independent of the window. Lock state is derived from cache entries,
//!   never a separate flag that can desync.
//!
//! - **Session Manager** (`session.rs`): opaque bearer tokens with TTL,
//!   lazy expiry on validate (authoritative) plus a periodic sweep
//!   (best-effort reclaim), revocation in place, and configurable
//!   refresh-token rotation with atomic retire-and-publish.
//!
//! ## Shared-State Layout
//!
//! All keys are namespaced under `warden:`; collaborators may observe them
//! but not own them:
//!
//! ```text
//! warden:throttle:<principal-key>   failure counter, TTL = window
//! warden:lock:<principal-key>       lock-until marker, TTL = cooldown
//! warden:session:<token>            session record, TTL = expiry + retention
//! warden:principal:<principal-id>   latest session token, for single-session policy
//! ```

pub mod session;
pub mod throttle;

pub use session::{
    RotationPolicy, Session, SessionError, SessionManager, SessionPolicy, SessionToken,
};
pub use throttle::{LoginThrottle, ThrottlePolicy};
