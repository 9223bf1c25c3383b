//! # Principal Directory Seam
//!
//! The collaborator-owned store of principals. The façade reads it to
//! resolve a username during login; it never writes principals — account
//! creation and soft-locking are the collaborator's concern.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use warden_core::{CredentialHash, DependencyError, PrincipalId};

/// Administrative status of a principal. Distinct from throttle lockout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrincipalStatus {
    /// Account may authenticate.
    Normal,
    /// Account is administratively locked (soft mark; principals are never
    /// deleted).
    Locked,
}

/// A principal as the directory stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalRecord {
    /// Stable identifier.
    pub id: PrincipalId,
    /// Login name, unique within the directory.
    pub username: String,
    /// Salted credential hash; never plaintext.
    pub credential: CredentialHash,
    /// Administrative status.
    pub status: PrincipalStatus,
}

/// Read access to the collaborator-owned principal store.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Resolve a username to its record, if any.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<PrincipalRecord>, DependencyError>;
}

/// In-memory directory: the configuration-supplied default for tests and
/// single-node deployments.
#[derive(Default)]
pub struct MemoryDirectory {
    records: RwLock<HashMap<String, PrincipalRecord>>,
}

impl MemoryDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a principal record.
    pub async fn upsert(&self, record: PrincipalRecord) {
        let mut guard = self.records.write().await;
        guard.insert(record.username.clone(), record);
    }

    /// Set a principal's administrative status.
    pub async fn set_status(&self, username: &str, status: PrincipalStatus) {
        let mut guard = self.records.write().await;
        if let Some(record) = guard.get_mut(username) {
            record.status = status;
        }
    }
}

#[async_trait]
impl PrincipalDirectory for MemoryDirectory {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<PrincipalRecord>, DependencyError> {
        let guard = self.records.read().await;
        Ok(guard.get(username).cloned())
    }
}
