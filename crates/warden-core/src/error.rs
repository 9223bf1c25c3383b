//! # Error Types — The Engine-Wide Taxonomy
//!
//! Four classes of failure, kept distinct end-to-end:
//!
//! - **Validation** — malformed input; reported to the caller, no side effect.
//! - **Denial** — a policy said no (constraint violation, lockout). A normal
//!   negative outcome, carried as a value by the components that produce it;
//!   this enum only wraps it where a single error channel is needed.
//! - **Dependency** — the shared cache or a collaborator store was
//!   unreachable or timed out. Distinct so callers can retry with backoff;
//!   the engine itself never retries (a retried failure-increment would
//!   double-count).
//! - **Configuration** — missing keys, dangling constraint references.
//!   Fatal at startup; the process must not serve traffic.
//!
//! All errors use `thiserror`. No expected business outcome is signalled by
//! panic or by a stringly-typed catch-all.

use thiserror::Error;

/// Top-level error type for the Warden engine.
#[derive(Error, Debug)]
pub enum WardenError {
    /// Malformed input; no side effect was taken.
    #[error("validation error: {0}")]
    Validation(String),

    /// A policy denied the operation.
    #[error("policy denial: {0}")]
    Denial(String),

    /// A dependency (cache, store) failed or timed out.
    #[error("dependency failure: {0}")]
    Dependency(#[from] DependencyError),

    /// Fatal configuration problem; surfaced at startup or reload.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// A failure of an external collaborator (shared cache, assignment store).
///
/// Timeouts are separated from transport errors so that callers can
/// distinguish "slow" from "broken" in their backoff policy. Neither is
/// ever silently mapped to an Allow or a Deny.
#[derive(Error, Debug)]
pub enum DependencyError {
    /// The call did not complete within the caller-supplied bound.
    #[error("{dependency} call timed out after {timeout_secs}s")]
    Timeout {
        /// Which dependency timed out (e.g. "cache", "assignment-store").
        dependency: &'static str,
        /// The bound that elapsed.
        timeout_secs: u64,
    },

    /// The dependency was reached but reported an error.
    #[error("{dependency} unavailable: {detail}")]
    Unavailable {
        /// Which dependency failed.
        dependency: &'static str,
        /// Transport-level detail.
        detail: String,
    },
}

/// Fatal configuration error. The process must not serve traffic.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration value is absent or empty.
    #[error("missing configuration: {0}")]
    Missing(String),

    /// A configuration value is present but unusable.
    #[error("invalid configuration for {key}: {detail}")]
    Invalid {
        /// The offending configuration key.
        key: String,
        /// Why it was rejected.
        detail: String,
    },

    /// A constraint definition references an unknown role or permission.
    #[error("constraint {constraint_id} references unknown grant {grant}")]
    DanglingReference {
        /// The constraint holding the dangling reference.
        constraint_id: String,
        /// Display form of the unknown grant.
        grant: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_timeout_display() {
        let err = DependencyError::Timeout {
            dependency: "cache",
            timeout_secs: 2,
        };
        assert_eq!(err.to_string(), "cache call timed out after 2s");
    }

    #[test]
    fn test_config_error_wraps_into_warden_error() {
        let err: WardenError = ConfigError::Missing("vault.public_key_pem".into()).into();
        assert!(err.to_string().contains("vault.public_key_pem"));
    }

    #[test]
    fn test_dangling_reference_display() {
        let err = ConfigError::DanglingReference {
            constraint_id: "constraint:abc".into(),
            grant: "role:def".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("constraint:abc"));
        assert!(msg.contains("role:def"));
    }
}
