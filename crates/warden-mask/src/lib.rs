//! # warden-mask — Scene-Aware Field Masking
//!
//! Decides, per field and per viewing context, whether to redact a value and
//! how. A field carries a `SensitiveFieldRule` (its mask kind plus the scenes
//! allowed to see it in the clear); at serialization time the policy combines
//! the rule with the viewer's privilege and the active scene.
//!
//! ## Decision order
//!
//! 1. Privileged viewer → original value, regardless of scene.
//! 2. Scene in the rule's allowed set → original value.
//! 3. Otherwise → the kind-specific transform.
//!
//! ## Transform guarantees
//!
//! - **Total**: transforms never fail; malformed input degrades to a full
//!   placeholder rather than breaking the serialization path.
//! - **Deterministic**: output depends only on (value, kind, widths).
//! - **Idempotent**: masking an already-masked value yields the same output.
//! - **No length leak for passwords**: the placeholder width is fixed.
//!
//! The masked output is derived solely from the rule and viewer context —
//! there is no caller-supplied bypass parameter that could smuggle an
//! unmasked value through.

pub mod policy;
pub mod scene;
pub mod transform;

pub use policy::{MaskingPolicy, SensitiveFieldRule};
pub use scene::MaskScene;
pub use transform::{MaskDefaults, MaskKind};
