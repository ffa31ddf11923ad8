//! Canonical forms for free-text comparison.
//!
//! Two forms coexist because they serve different call sites:
//! [`normalize`] is the aggressive scoring form (spacing and hyphens are
//! pure formatting noise for part codes), [`normalize_text`] is the
//! word-preserving parsing form used on descriptions.
//! Both are idempotent.

/// Scoring form: lowercase, hyphens and all whitespace removed.
///
/// `"RM1-1740 040CN"` and `"rm11740040cn"` normalize identically, so
/// formatting differences never dent a similarity score.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Parsing form: lowercase, periods to spaces, whitespace collapsed,
/// trimmed. Word boundaries survive.
pub fn normalize_text(s: &str) -> String {
    let lowered = s.to_lowercase().replace('.', " ");
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize("RM1-1740 040CN"), "rm11740040cn");
        assert_eq!(normalize("  Термоплёнка  HP  "), "термоплёнкаhp");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("Шлейф  панели\tSharp"), "шлейф панели sharp");
        assert_eq!(normalize_text("арт. QCNW-0208FCZZ"), "арт qcnw-0208fczz");
        assert_eq!(normalize_text("   "), "");
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(s in ".*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalize_text_idempotent(s in ".*") {
            let once = normalize_text(&s);
            prop_assert_eq!(normalize_text(&once), once);
        }
    }
}
