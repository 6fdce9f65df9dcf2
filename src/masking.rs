//! Log-safe rendering of click identifiers.
//!
//! Only diagnostics and the postback log ever see masked ids; outbound URLs
//! always carry the original value.

use crate::config::MaskingConfig;

/// Keep the first `keep_left` and last `keep_right` characters of `identifier`
/// and replace the rest with `mask_char`. Identifiers no longer than
/// `keep_left + keep_right` are masked entirely. Lengths are counted in chars.
pub fn mask(identifier: Option<&str>, keep_left: usize, keep_right: usize, mask_char: char) -> Option<String> {
    let identifier = identifier?;
    let chars: Vec<char> = identifier.chars().collect();
    let len = chars.len();

    if len <= keep_left + keep_right {
        return Some(std::iter::repeat(mask_char).take(len).collect());
    }

    let mut masked = String::with_capacity(identifier.len());
    masked.extend(&chars[..keep_left]);
    masked.extend(std::iter::repeat(mask_char).take(len - keep_left - keep_right));
    masked.extend(&chars[len - keep_right..]);
    Some(masked)
}

impl MaskingConfig {
    /// Apply masking when enabled; otherwise hand the identifier back unchanged.
    pub fn apply(&self, identifier: Option<&str>) -> String {
        let rendered = if self.enabled {
            mask(identifier, self.keep_left, self.keep_right, self.mask_char)
        } else {
            identifier.map(str::to_string)
        };
        rendered.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_edges_of_long_identifiers() {
        assert_eq!(mask(Some("abcdefgh"), 3, 2, '*').as_deref(), Some("abc***gh"));
    }

    #[test]
    fn fully_masks_short_identifiers() {
        assert_eq!(mask(Some("ab"), 3, 2, '*').as_deref(), Some("**"));
        assert_eq!(mask(Some("abcde"), 3, 2, '*').as_deref(), Some("*****"));
    }

    #[test]
    fn absent_identifier_passes_through() {
        assert_eq!(mask(None, 3, 2, '*'), None);
        assert_eq!(mask(Some(""), 3, 2, '*').as_deref(), Some(""));
    }

    #[test]
    fn zero_right_keep_masks_the_tail() {
        assert_eq!(mask(Some("abcdef"), 2, 0, '#').as_deref(), Some("ab####"));
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(mask(Some("ééééééé"), 1, 1, '*').as_deref(), Some("é*****é"));
    }

    #[test]
    fn config_disabled_returns_original() {
        let cfg = MaskingConfig {
            enabled: false,
            ..MaskingConfig::default()
        };
        assert_eq!(cfg.apply(Some("abcdefgh")), "abcdefgh");
        assert_eq!(cfg.apply(None), "");
    }

    #[test]
    fn config_enabled_uses_configured_counts() {
        let cfg = MaskingConfig::default();
        assert_eq!(cfg.apply(Some("abcdefgh")), "abc***gh");
    }
}
