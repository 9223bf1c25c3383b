//! # Exposure Scenes
//!
//! The context a value is being serialized into. Rules whitelist scenes;
//! any scene not whitelisted gets the masked form.

use serde::{Deserialize, Serialize};

/// The context of data exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaskScene {
    /// Outbound API response to an end user or client.
    ApiResponse,
    /// Internal structured log line.
    InternalLog,
    /// Regulatory or audit export.
    AuditExport,
}

impl std::fmt::Display for MaskScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ApiResponse => "API_RESPONSE",
            Self::InternalLog => "INTERNAL_LOG",
            Self::AuditExport => "AUDIT_EXPORT",
        };
        f.write_str(s)
    }
}
