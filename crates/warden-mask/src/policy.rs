//! # Masking Policy
//!
//! Combines a field's `SensitiveFieldRule` with the viewer's privilege and
//! the active scene to decide what leaves the engine. Rules are declared
//! statically per payload shape (field tag → rule) and evaluated at
//! serialization time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scene::MaskScene;
use crate::transform::{MaskDefaults, MaskKind};

/// The masking rule attached to one sensitive field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitiveFieldRule {
    /// Which transform applies when the field must be masked.
    pub kind: MaskKind,
    /// Scenes allowed to see the original value.
    pub allowed_scenes: Vec<MaskScene>,
}

impl SensitiveFieldRule {
    /// A rule with no allowed scenes: always masked for non-privileged viewers.
    pub fn always_masked(kind: MaskKind) -> Self {
        Self {
            kind,
            allowed_scenes: Vec::new(),
        }
    }

    /// A rule allowing the given scenes to see the original.
    pub fn allowing(kind: MaskKind, scenes: &[MaskScene]) -> Self {
        Self {
            kind,
            allowed_scenes: scenes.to_vec(),
        }
    }
}

/// A masking policy: reveal-width configuration plus a field-tag rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingPolicy {
    /// Transform widths and fill character.
    pub defaults: MaskDefaults,
    /// Field tag → rule. Fields without a rule pass through untouched.
    pub rules: BTreeMap<String, SensitiveFieldRule>,
}

impl MaskingPolicy {
    /// A policy with default widths and an empty rule table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule for a field tag (builder style).
    pub fn with_rule(mut self, field: &str, rule: SensitiveFieldRule) -> Self {
        self.rules.insert(field.to_string(), rule);
        self
    }

    /// Mask a single value under `rule` for the given viewer context.
    ///
    /// The output depends only on (value, rule, privilege, scene) — there is
    /// no caller-supplied escape hatch.
    pub fn mask_value(
        &self,
        value: &str,
        rule: &SensitiveFieldRule,
        viewer_privileged: bool,
        scene: MaskScene,
    ) -> String {
        if viewer_privileged {
            // Administrative bypass: privileged viewers see the original.
            return value.to_string();
        }
        if rule.allowed_scenes.contains(&scene) {
            return value.to_string();
        }
        self.defaults.apply(rule.kind, value)
    }

    /// Shape a whole payload: every field with a registered rule is masked
    /// per the viewer context; unknown fields pass through.
    pub fn mask_fields(
        &self,
        payload: &BTreeMap<String, String>,
        viewer_privileged: bool,
        scene: MaskScene,
    ) -> BTreeMap<String, String> {
        payload
            .iter()
            .map(|(field, value)| {
                let shaped = match self.rules.get(field) {
                    Some(rule) => self.mask_value(value, rule, viewer_privileged, scene),
                    None => value.clone(),
                };
                (field.clone(), shaped)
            })
            .collect()
    }
}
