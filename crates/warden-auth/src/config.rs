//! # Engine Configuration
//!
//! One struct gathering every policy knob the façade composes. Loaded once
//! at startup; the vault key material inside is validated there (fail fast).

use warden_mask::MaskingPolicy;
use warden_session::{SessionPolicy, ThrottlePolicy};
use warden_vault::VaultConfig;

/// Process-wide configuration for the authorization engine.
#[derive(Debug, Clone)]
pub struct WardenConfig {
    /// Vault key material (PEM). Absence is a fatal startup error.
    pub vault: VaultConfig,
    /// Login throttle window/threshold/cooldown.
    pub throttle: ThrottlePolicy,
    /// Session TTL, retention, rotation, and single-session policy.
    pub session: SessionPolicy,
    /// Field masking rules and reveal widths.
    pub masking: MaskingPolicy,
    /// Bound on every shared-cache and collaborator-store call.
    pub dependency_timeout_secs: u64,
}

impl WardenConfig {
    /// Configuration with default policies around the given vault keys.
    pub fn with_vault(vault: VaultConfig) -> Self {
        Self {
            vault,
            throttle: ThrottlePolicy::default(),
            session: SessionPolicy::default(),
            masking: MaskingPolicy::default(),
            dependency_timeout_secs: 5,
        }
    }
}
