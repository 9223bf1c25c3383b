//! # Credential Hashing
//!
//! Salted SHA-256 credential hashes with constant-time verification.
//! The engine never stores or logs a plaintext credential; the hash type
//! exposes no way to recover one.
//!
//! ## Security Invariant
//!
//! - Verification uses `subtle::ConstantTimeEq` — a mismatching credential
//!   takes the same time to reject regardless of where it differs.
//! - `Debug` output is redacted. Serde representation carries only the salt
//!   and digest as hex, never plaintext.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Salt length in bytes for newly created hashes.
const SALT_LEN: usize = 16;

/// A salted SHA-256 hash of a credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialHash {
    /// Per-credential random salt, hex-encoded.
    salt: String,
    /// `SHA-256(salt_bytes || credential_bytes)`, hex-encoded.
    digest: String,
}

impl CredentialHash {
    /// Hash a plaintext credential with a fresh random salt.
    pub fn derive(credential: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        let digest = salted_digest(&salt, credential.as_bytes());
        Self {
            salt: to_hex(&salt),
            digest: to_hex(&digest),
        }
    }

    /// Verify a plaintext credential against this hash in constant time.
    ///
    /// A hash record with a malformed salt never verifies; it does not panic.
    pub fn verify(&self, credential: &str) -> bool {
        let Some(salt) = from_hex(&self.salt) else {
            return false;
        };
        let candidate = to_hex(&salted_digest(&salt, credential.as_bytes()));
        candidate.as_bytes().ct_eq(self.digest.as_bytes()).into()
    }
}

impl std::fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

fn salted_digest(salt: &[u8], credential: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(credential);
    hasher.finalize().into()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}
