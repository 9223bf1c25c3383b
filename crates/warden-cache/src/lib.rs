//! # warden-cache — The Shared-Cache Seam
//!
//! The throttle counters and session records of the Warden engine live in a
//! shared cache owned by the deployment (typically Redis or an equivalent).
//! This crate defines the narrow async contract the engine needs from that
//! cache, an in-memory implementation for tests and single-node use, and a
//! decorator that bounds every call with a timeout.
//!
//! ## Contract Highlights
//!
//! - **Atomic increment-and-fetch.** `increment` is the linearizable
//!   primitive the login throttle is built on; concurrent failed attempts
//!   from the same principal never under-count.
//! - **Atomic swap.** `swap` retires one key and publishes another in a
//!   single step, which is how refresh-token rotation avoids a window where
//!   both tokens are valid.
//! - **TTL-scoped entries.** Every entry can carry a time-to-live; expiry is
//!   enforced on read and reclaimed by `purge_expired`.
//!
//! ## Crate Policy
//!
//! - Errors are `warden_core::DependencyError` — cache trouble is a
//!   dependency failure, never an Allow or a Deny.
//! - No engine-internal lock is held across an await point by callers;
//!   the trait is the suspension boundary.

pub mod bounded;
pub mod cache;
pub mod memory;

pub use bounded::BoundedCache;
pub use cache::SharedCache;
pub use memory::MemoryCache;
