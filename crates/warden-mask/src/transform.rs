//! # Mask Transforms
//!
//! The type-specific redaction transforms. Each is a total function of
//! (value, kind, widths): no panics, no errors, and character-based
//! indexing so multi-byte input cannot split a code point.
//!
//! Partial-reveal transforms keep a fixed-width masked middle. The fixed
//! width is what makes them idempotent — re-masking a masked value finds
//! the same prefix and suffix and replaces the middle with itself — and it
//! also caps how much structure the masked form can leak about the
//! original length.

use serde::{Deserialize, Serialize};

/// The kind of sensitive value a rule protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaskKind {
    /// Credential material: fixed placeholder, never reveals length.
    Password,
    /// Phone number: partial reveal, prefix and suffix kept.
    Phone,
    /// Email address: first character plus domain kept.
    Email,
    /// Government identity number: narrow partial reveal.
    IdNumber,
    /// Bank card number: last-four reveal.
    BankCard,
    /// Personal name: first character kept.
    Name,
}

/// Reveal-width configuration for the partial transforms.
///
/// These are policy, not law: deployments tune them per data-protection
/// requirements. The defaults are conservative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskDefaults {
    /// Fill character for masked runs.
    pub fill: char,
    /// Width of every masked middle run (and of the full-mask placeholder).
    pub mask_width: usize,
    /// Fixed width of the password placeholder.
    pub password_width: usize,
    /// (prefix, suffix) reveal widths for phone numbers.
    pub phone_reveal: (usize, usize),
    /// (prefix, suffix) reveal widths for identity numbers.
    pub id_reveal: (usize, usize),
    /// (prefix, suffix) reveal widths for bank cards.
    pub card_reveal: (usize, usize),
}

impl Default for MaskDefaults {
    fn default() -> Self {
        Self {
            fill: '*',
            mask_width: 4,
            password_width: 8,
            phone_reveal: (3, 4),
            id_reveal: (2, 2),
            card_reveal: (0, 4),
        }
    }
}

impl MaskDefaults {
    /// The full-mask placeholder used when a value is too short or malformed
    /// to partially reveal.
    pub fn placeholder(&self) -> String {
        fill_run(self.fill, self.mask_width)
    }

    /// Apply the transform for `kind` to `value`.
    ///
    /// Empty input is returned as-is (nothing to mask). Total: every other
    /// input produces a masked string, degrading to the full placeholder.
    pub fn apply(&self, kind: MaskKind, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }
        match kind {
            MaskKind::Password => fill_run(self.fill, self.password_width),
            MaskKind::Phone => self.partial(value, self.phone_reveal),
            MaskKind::IdNumber => self.partial(value, self.id_reveal),
            MaskKind::BankCard => self.partial(value, self.card_reveal),
            MaskKind::Name => self.partial(value, (1, 0)),
            MaskKind::Email => self.email(value),
        }
    }

    /// Keep `prefix` leading and `suffix` trailing characters; replace the
    /// middle with a fixed-width fill run.
    fn partial(&self, value: &str, (prefix, suffix): (usize, usize)) -> String {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() <= prefix + suffix {
            // Too short to reveal anything without handing back most of it.
            return self.placeholder();
        }
        let mut out = String::new();
        out.extend(&chars[..prefix]);
        out.push_str(&fill_run(self.fill, self.mask_width));
        out.extend(&chars[chars.len() - suffix..]);
        out
    }

    /// Keep the first character of the local part and the whole domain.
    fn email(&self, value: &str) -> String {
        let Some((local, domain)) = value.split_once('@') else {
            return self.placeholder();
        };
        let Some(first) = local.chars().next() else {
            return self.placeholder();
        };
        format!("{first}{}@{domain}", fill_run(self.fill, self.mask_width))
    }
}

fn fill_run(fill: char, width: usize) -> String {
    std::iter::repeat(fill).take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d() -> MaskDefaults {
        MaskDefaults::default()
    }

    #[test]
    fn test_password_fixed_width() {
        assert_eq!(d().apply(MaskKind::Password, "x"), "********");
        assert_eq!(
            d().apply(MaskKind::Password, "a-very-long-credential-value"),
            "********"
        );
    }

    #[test]
    fn test_phone_partial_reveal() {
        assert_eq!(d().apply(MaskKind::Phone, "13812345678"), "138****5678");
    }

    #[test]
    fn test_phone_short_degrades_to_placeholder() {
        assert_eq!(d().apply(MaskKind::Phone, "1381234"), "****");
    }

    #[test]
    fn test_id_number_reveal() {
        assert_eq!(d().apply(MaskKind::IdNumber, "4201061990X"), "42****0X");
    }

    #[test]
    fn test_bank_card_last_four() {
        assert_eq!(d().apply(MaskKind::BankCard, "6222021234567890"), "****7890");
    }

    #[test]
    fn test_name_first_char() {
        assert_eq!(d().apply(MaskKind::Name, "Armstrong"), "A****");
    }

    #[test]
    fn test_email_keeps_domain() {
        assert_eq!(
            d().apply(MaskKind::Email, "alice@example.com"),
            "a****@example.com"
        );
    }

    #[test]
    fn test_email_without_at_degrades() {
        assert_eq!(d().apply(MaskKind::Email, "not-an-email"), "****");
        assert_eq!(d().apply(MaskKind::Email, "@example.com"), "****");
    }

    #[test]
    fn test_empty_value_passes_through() {
        for kind in [
            MaskKind::Password,
            MaskKind::Phone,
            MaskKind::Email,
            MaskKind::IdNumber,
            MaskKind::BankCard,
            MaskKind::Name,
        ] {
            assert_eq!(d().apply(kind, ""), "");
        }
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        let masked = d().apply(MaskKind::Phone, "电话13812345678");
        assert!(masked.starts_with("电话1"));
        assert!(masked.ends_with("5678"));
        let _ = d().apply(MaskKind::Name, "张三");
    }

    #[test]
    fn test_idempotence_all_kinds() {
        let samples = [
            (MaskKind::Password, "hunter2"),
            (MaskKind::Phone, "13812345678"),
            (MaskKind::Email, "alice@example.com"),
            (MaskKind::IdNumber, "42010619900101001X"),
            (MaskKind::BankCard, "6222021234567890"),
            (MaskKind::Name, "Armstrong"),
        ];
        for (kind, value) in samples {
            let once = d().apply(kind, value);
            let twice = d().apply(kind, &once);
            assert_eq!(once, twice, "{kind:?} transform not idempotent");
        }
    }

    #[test]
    fn test_reveal_is_bounded() {
        // Non-privileged output never contains more than prefix+suffix
        // characters of the original (phone: 3 + 4).
        let masked = d().apply(MaskKind::Phone, "13812345678");
        let revealed: usize = masked.chars().filter(|c| *c != '*').count();
        assert_eq!(revealed, 7);
    }

    #[test]
    fn test_determinism() {
        assert_eq!(
            d().apply(MaskKind::Phone, "13812345678"),
            d().apply(MaskKind::Phone, "13812345678")
        );
    }
}
