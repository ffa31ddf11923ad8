//! Similarity scoring between a query and a candidate product name.

use super::normalize::normalize;

/// Edit-distance similarity between a query and a candidate name,
/// scaled to 0-100 over the normalized forms.
///
/// An empty candidate scores 0. Strings that differ only in case,
/// spacing, or hyphenation score 100.
pub fn score(query: &str, candidate_name: &str) -> u8 {
    if candidate_name.trim().is_empty() {
        return 0;
    }

    let q = normalize(query);
    let n = normalize(candidate_name);
    if n.is_empty() {
        return 0;
    }

    let ratio = strsim::normalized_levenshtein(&q, &n);
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal_after_normalization_scores_100() {
        assert_eq!(score("RM1-1740-040CN", "rm1 1740 040cn"), 100);
        assert_eq!(score("Термоплёнка HP", "термоплёнка hp"), 100);
    }

    #[test]
    fn test_empty_candidate_scores_0() {
        assert_eq!(score("RM1-1740-040CN", ""), 0);
        assert_eq!(score("RM1-1740-040CN", "   "), 0);
    }

    #[test]
    fn test_disjoint_strings_score_low() {
        let s = score("RM1-1740-040CN", "чернила для плоттера Epson");
        assert!(s < 30, "expected near-zero score, got {s}");
    }

    #[test]
    fn test_close_names_score_high() {
        let s = score(
            "Термоплёнка RM1-1740-040CN",
            "Термоплёнка RM1-1740-040CN для HP",
        );
        assert!(s >= 70, "expected acceptable score, got {s}");
    }

    proptest! {
        #[test]
        fn prop_score_bounded(q in ".*", n in ".*") {
            prop_assert!(score(&q, &n) <= 100);
        }

        #[test]
        fn prop_self_score_is_100(s in ".+") {
            // Anything with a non-empty normalized form matches itself.
            prop_assume!(!super::normalize(&s).is_empty());
            prop_assert_eq!(score(&s, &s), 100);
        }
    }
}
