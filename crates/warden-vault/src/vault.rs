//! # RSA-OAEP Vault
//!
//! Configuration loading, the encrypt/decrypt pair, and the typed failure
//! taxonomy for ciphertext handling.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use thiserror::Error;
use warden_core::ConfigError;

/// Typed failure for vault operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VaultError {
    /// The ciphertext is malformed or fails OAEP verification.
    ///
    /// Tampering and corruption land here; OAEP cannot distinguish a
    /// tampered block from garbage, but it never yields a wrong plaintext.
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    /// The ciphertext was produced under a different key (wrong block size).
    #[error("ciphertext does not match the configured key pair")]
    KeyMismatch,

    /// The plaintext exceeds what one OAEP block can carry.
    #[error("plaintext too large: {size} bytes exceeds the {max}-byte limit")]
    PlaintextTooLarge {
        /// Offered plaintext size.
        size: usize,
        /// Maximum for the configured key and digest.
        max: usize,
    },
}

/// PEM key material for the vault, supplied by process configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// PKCS#8 / SPKI public key PEM.
    pub public_key_pem: String,
    /// PKCS#8 private key PEM.
    pub private_key_pem: String,
}

/// The credential vault: one process-wide RSA key pair, no other state.
pub struct CredentialVault {
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
}

impl CredentialVault {
    /// Load and validate the vault key pair.
    ///
    /// # Errors
    ///
    /// Fatal `ConfigError` when a PEM is missing/empty, unparseable, or the
    /// two keys do not pair (verified by an encrypt/decrypt probe). A
    /// process that cannot load its vault must not serve traffic.
    pub fn from_config(config: &VaultConfig) -> Result<Self, ConfigError> {
        if config.public_key_pem.trim().is_empty() {
            return Err(ConfigError::Missing("vault.public_key_pem".into()));
        }
        if config.private_key_pem.trim().is_empty() {
            return Err(ConfigError::Missing("vault.private_key_pem".into()));
        }
        let public_key = RsaPublicKey::from_public_key_pem(&config.public_key_pem).map_err(
            |e| ConfigError::Invalid {
                key: "vault.public_key_pem".into(),
                detail: e.to_string(),
            },
        )?;
        let private_key = RsaPrivateKey::from_pkcs8_pem(&config.private_key_pem).map_err(
            |e| ConfigError::Invalid {
                key: "vault.private_key_pem".into(),
                detail: e.to_string(),
            },
        )?;

        let vault = Self {
            public_key,
            private_key,
        };
        // Pairing probe: a mismatched pair must fail at startup, not on the
        // first login of the day.
        let probe = vault
            .encrypt(b"warden-vault-probe")
            .map_err(|e| ConfigError::Invalid {
                key: "vault.key_pair".into(),
                detail: e.to_string(),
            })?;
        match vault.decrypt(&probe) {
            Ok(plain) if plain == b"warden-vault-probe" => Ok(vault),
            _ => Err(ConfigError::Invalid {
                key: "vault.key_pair".into(),
                detail: "public and private keys do not pair".into(),
            }),
        }
    }

    /// Maximum plaintext size for one OAEP-SHA256 block under this key.
    pub fn max_plaintext_len(&self) -> usize {
        // OAEP overhead: 2 * hash_len + 2.
        self.public_key.size() - 2 * 32 - 2
    }

    /// Encrypt plaintext to base64 ciphertext under the public key.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, VaultError> {
        let max = self.max_plaintext_len();
        if plaintext.len() > max {
            return Err(VaultError::PlaintextTooLarge {
                size: plaintext.len(),
                max,
            });
        }
        let mut rng = rand::rngs::OsRng;
        let ciphertext = self
            .public_key
            .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext)
            .map_err(|e| VaultError::InvalidCiphertext(e.to_string()))?;
        Ok(BASE64.encode(ciphertext))
    }

    /// Decrypt base64 ciphertext under the private key.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidCiphertext`] — not base64, or OAEP rejects the
    ///   block (tampered/corrupted).
    /// - [`VaultError::KeyMismatch`] — the block size belongs to a different
    ///   key.
    pub fn decrypt(&self, ciphertext: &str) -> Result<Vec<u8>, VaultError> {
        let raw = BASE64
            .decode(ciphertext.trim())
            .map_err(|e| VaultError::InvalidCiphertext(format!("base64: {e}")))?;
        if raw.len() != self.public_key.size() {
            return Err(VaultError::KeyMismatch);
        }
        self.private_key
            .decrypt(Oaep::new::<Sha256>(), &raw)
            .map_err(|_| VaultError::InvalidCiphertext("OAEP verification failed".into()))
    }
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialVault(<private>)")
    }
}
