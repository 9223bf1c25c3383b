//! # warden-vault — Credential Vault
//!
//! Asymmetric encryption of credential material in transit. Clients encrypt
//! a credential with the process public key; only this process can decrypt
//! it. The vault holds no other state.
//!
//! ## Security Invariant
//!
//! - Key material is process-wide configuration, loaded once at startup and
//!   validated there: missing or unparseable PEM, or a public key that does
//!   not pair with the private key, is a fatal `ConfigError` — fail fast,
//!   never a runtime retry.
//! - Decrypt failures are typed (`InvalidCiphertext` vs `KeyMismatch`);
//!   there is no plaintext fallback, and a tampered ciphertext can never
//!   yield a wrong plaintext (OAEP authenticates the padding).
//! - The private key is never serialized, logged, or exposed; `Debug` on
//!   the vault is redacted.
//!
//! Cipher: RSA-OAEP over SHA-256, ciphertext carried as standard base64.

pub mod vault;

pub use vault::{CredentialVault, VaultConfig, VaultError};
