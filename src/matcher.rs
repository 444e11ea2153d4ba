//! Fuzzy question matching: normalization plus a Ratcliff/Obershelp
//! similarity ratio over character sequences.
//!
//! Two questions are considered equivalent when their normalized forms are
//! identical, or when the similarity ratio of the normalized forms reaches
//! the configured threshold (0.80 by default). Normalization lowercases,
//! strips punctuation, and collapses whitespace, so `"Can I book a HAIRCUT
//! tomorrow??"` and `"can i book a haircut tomorrow"` compare equal.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum similarity ratio for two non-identical questions to match.
pub const SIMILARITY_THRESHOLD: f64 = 0.80;

static RE_NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Canonical form of a free-text question: lowercase, punctuation stripped,
/// whitespace runs collapsed to single spaces, trimmed. Blank input yields
/// the empty string.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = RE_NON_WORD.replace_all(&lowered, "");
    let collapsed = RE_WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Similarity of two character sequences in `[0, 1]`.
///
/// Ratcliff/Obershelp: twice the total length of all longest matching blocks
/// divided by the combined length of both inputs. Two empty sequences have
/// ratio 1.0.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_chars(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total characters covered by recursively extracted longest matching blocks.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_match(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..ai], &b[..bi]) + matching_chars(&a[ai + len..], &b[bi + len..])
}

/// Longest common contiguous block, as `(start_in_a, start_in_b, length)`.
/// Ties resolve to the earliest block in `a`.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // prev[j + 1] is the common-suffix length ending at (i - 1, j).
    let mut prev = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                cur[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = cur;
    }
    best
}

/// Compares normalized questions for equivalence at a configurable threshold.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            threshold: SIMILARITY_THRESHOLD,
        }
    }
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// True iff the normalized forms are identical or similar enough.
    ///
    /// A blank side never matches: a knowledge entry whose question
    /// normalizes to the empty string carries no information, and two empty
    /// strings would otherwise trivially match at ratio 1.0.
    pub fn is_match(&self, a: &str, b: &str) -> bool {
        let na = normalize(a);
        let nb = normalize(b);
        if na.is_empty() || nb.is_empty() {
            return false;
        }
        na == nb || ratio(&na, &nb) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_strips_and_collapses() {
        assert_eq!(
            normalize("  Can I book a HAIRCUT tomorrow??  "),
            "can i book a haircut tomorrow"
        );
        assert_eq!(normalize("what's   your\taddress?"), "whats your address");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  ?!.,  "), "");
    }

    #[test]
    fn ratio_known_values() {
        // Classic SequenceMatcher example: blocks "bcd" → 2*3/8.
        assert!((ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert!((ratio("", "") - 1.0).abs() < 1e-9);
        assert!((ratio("abc", "abc") - 1.0).abs() < 1e-9);
        assert!((ratio("abc", "xyz")).abs() < 1e-9);
    }

    #[test]
    fn ratio_is_order_sensitive_but_bounded() {
        let r = ratio("can i book a haircut", "can i book a hair cut");
        assert!(r > 0.9 && r <= 1.0);
    }

    #[test]
    fn matches_normalized_equal_questions() {
        let m = FuzzyMatcher::default();
        assert!(m.is_match(
            "Can I book a HAIRCUT tomorrow??",
            "can i book a haircut tomorrow"
        ));
    }

    #[test]
    fn matches_near_duplicates_above_threshold() {
        let m = FuzzyMatcher::default();
        assert!(m.is_match(
            "Can I book a haircut tomorrow?",
            "Can I book a hair cut tomorrow?"
        ));
    }

    #[test]
    fn rejects_unrelated_questions() {
        let m = FuzzyMatcher::default();
        assert!(!m.is_match("What are your working hours?", "Do you do nails?"));
    }

    #[test]
    fn blank_sides_never_match() {
        let m = FuzzyMatcher::default();
        assert!(!m.is_match("", ""));
        assert!(!m.is_match("?!", "..."));
        assert!(!m.is_match("Do you do nails?", "   "));
    }

    #[test]
    fn threshold_is_configurable() {
        let strict = FuzzyMatcher::new(0.99);
        assert!(!strict.is_match("can i book a haircut", "can i book a hair cut x y z"));
        let loose = FuzzyMatcher::new(0.5);
        assert!(loose.is_match("book a haircut", "book a hair cut please"));
    }
}
