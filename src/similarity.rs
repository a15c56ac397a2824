// src/similarity.rs
//! # Similarity Functions
//!
//! String-similarity primitives and the blended scores built from them.
//!
//! Three primitives cover the ways a legal company name diverges from its
//! casual rendering (abbreviation, concatenation, truncation, reordering):
//!
//! - [`sequence_ratio`] — classic sequence matching, `2*M / T` where `M`
//!   is the longest-common-subsequence length.
//! - [`partial_ratio`] — best window alignment of the shorter string
//!   inside the longer one (rewards verbatim containment).
//! - [`token_set_ratio`] — order- and duplicate-insensitive token overlap.
//!
//! The blends (`name_similarity`, `domain_similarity`, `email_similarity`)
//! combine these with fixed weights; whole-string, token-set and substring
//! measures compensate for each other while resisting false positives from
//! short or common tokens.

use std::collections::BTreeSet;

use crate::normalize::{NameNormalizer, NormalizerTables};

/// Character-sequence ratio in [0,1]: `2*matches / (len_a + len_b)`,
/// matches computed as the longest common subsequence length. Two empty
/// strings ratio to 1.0.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (ab, bb) = (a.as_bytes(), b.as_bytes());
    let matches = lcs_length(ab, bb);
    2.0 * matches as f64 / (ab.len() + bb.len()) as f64
}

/// LCS length using two-row DP (space-optimised).
fn lcs_length(a: &[u8], b: &[u8]) -> usize {
    let n = b.len();
    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];

    for i in 1..=a.len() {
        for j in 1..=n {
            if a[i - 1] == b[j - 1] {
                curr[j] = prev[j - 1] + 1;
            } else {
                curr[j] = curr[j - 1].max(prev[j]);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
        curr.fill(0);
    }
    prev[n]
}

/// Best substring alignment in [0,100]: the shorter string is slid over
/// every same-length window of the longer and the best [`sequence_ratio`]
/// wins. Empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let s = shorter.as_bytes();
    let l = longer.as_bytes();
    let m = s.len();

    let mut best = 0.0f64;
    for start in 0..=(l.len() - m) {
        let window = &l[start..start + m];
        let ratio = 2.0 * lcs_length(s, window) as f64 / (2 * m) as f64;
        if ratio > best {
            best = ratio;
            if best >= 1.0 {
                break;
            }
        }
    }
    best * 100.0
}

/// Token-set ratio in [0,100]: tokens are split on whitespace, deduplicated
/// and sorted; the intersection and the two "intersection + remainder"
/// strings are compared pairwise with [`sequence_ratio`] and the best wins.
/// Word order and duplicates do not matter. Empty input scores 0.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let inter = join_tokens(ta.intersection(&tb).copied());
    let rest_a = join_tokens(ta.difference(&tb).copied());
    let rest_b = join_tokens(tb.difference(&ta).copied());

    let combined_a = join_nonempty(&inter, &rest_a);
    let combined_b = join_nonempty(&inter, &rest_b);

    sequence_ratio(&inter, &combined_a)
        .max(sequence_ratio(&inter, &combined_b))
        .max(sequence_ratio(&combined_a, &combined_b))
        * 100.0
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// Email similarity in [0,100]: local parts weigh 0.7, domain parts 0.3.
/// Returns 0 unless both addresses split on '@' into exactly two parts.
pub fn email_similarity(email1: &str, email2: &str) -> f64 {
    let e1 = email1.trim().to_lowercase();
    let e2 = email2.trim().to_lowercase();

    let p1: Vec<&str> = e1.split('@').collect();
    let p2: Vec<&str> = e2.split('@').collect();
    if p1.len() != 2 || p2.len() != 2 {
        return 0.0;
    }

    let local = sequence_ratio(p1[0], p2[0]);
    let domain = sequence_ratio(p1[1], p2[1]);
    (local * 0.7 + domain * 0.3) * 100.0
}

/* ----------------------------
Blended matchers
---------------------------- */

/// Default primary/secondary split weights for [`TextMatcher::name_similarity`].
pub const NAME_WEIGHT_PRIMARY: f64 = 0.6;
pub const NAME_WEIGHT_SECONDARY: f64 = 0.4;

/// Owns the configured normalizer and exposes the blended similarity
/// scores. One instance per engine; all methods are `&self` and pure.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    normalizer: NameNormalizer,
}

impl TextMatcher {
    pub fn new(tables: &NormalizerTables) -> Self {
        Self {
            normalizer: NameNormalizer::new(tables),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&NormalizerTables::default())
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    /// Name similarity in [0,1] with the default 0.6/0.4 split.
    pub fn name_similarity(&self, name1: &str, name2: &str) -> f64 {
        self.name_similarity_weighted(name1, name2, NAME_WEIGHT_PRIMARY, NAME_WEIGHT_SECONDARY)
    }

    /// Name similarity in [0,1]. Both names are normalized and split into a
    /// "primary" part (first two tokens) and a "secondary" part (the rest);
    /// the parts are sequence-matched independently and blended. Returns
    /// 0.0 if either name normalizes to zero tokens.
    pub fn name_similarity_weighted(
        &self,
        name1: &str,
        name2: &str,
        w_primary: f64,
        w_secondary: f64,
    ) -> f64 {
        let n1 = self.normalizer.normalize(name1);
        let n2 = self.normalizer.normalize(name2);

        let words1: Vec<&str> = n1.split_whitespace().collect();
        let words2: Vec<&str> = n2.split_whitespace().collect();
        if words1.is_empty() || words2.is_empty() {
            return 0.0;
        }

        let split1 = words1.len().min(2);
        let split2 = words2.len().min(2);
        let primary1 = words1[..split1].join(" ");
        let secondary1 = words1[split1..].join(" ");
        let primary2 = words2[..split2].join(" ");
        let secondary2 = words2[split2..].join(" ");

        let primary_sim = sequence_ratio(&primary1, &primary2);
        let secondary_sim = sequence_ratio(&secondary1, &secondary2);

        primary_sim * w_primary + secondary_sim * w_secondary
    }

    /// Company-name vs. domain similarity in [0,100].
    ///
    /// Both sides are normalized; the second-to-last dot-label of the
    /// normalized domain is the "core" label (the sole label if there is
    /// only one). Four ratios blend as
    /// `0.5*coreTokenSet + 0.2*corePartial + 0.2*fullTokenSet + 0.1*fullPartial`,
    /// then substring containment is rewarded: any partial ratio above 30
    /// floors the score at 60, and above 50 additionally scales it by 1.5
    /// capped at 95.
    pub fn domain_similarity(&self, company_name: &str, domain: &str) -> f64 {
        let company = self.normalizer.normalize(company_name);
        let domain_norm = self.normalizer.normalize(domain);

        let parts: Vec<&str> = domain_norm.split('.').collect();
        let core = if parts.len() >= 2 {
            parts[parts.len() - 2]
        } else {
            parts[0]
        };

        let core_set = token_set_ratio(&company, core);
        let full_set = token_set_ratio(&company, &domain_norm);
        let core_partial = partial_ratio(&company, core);
        let full_partial = partial_ratio(&company, &domain_norm);

        let mut score =
            core_set * 0.5 + core_partial * 0.2 + full_set * 0.2 + full_partial * 0.1;

        if score > 0.0 && (core_partial > 30.0 || full_partial > 30.0) {
            // Company name embedded verbatim in the domain deserves more
            // than the blended average gives it.
            score = score.max(60.0);
            if core_partial > 50.0 || full_partial > 50.0 {
                score = (score * 1.5).min(95.0);
            }
        }

        score
    }
}

impl Default for TextMatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_ratio_identical_is_one() {
        assert!((sequence_ratio("gulf trading", "gulf trading") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sequence_ratio_empty_inputs() {
        assert!((sequence_ratio("", "") - 1.0).abs() < 1e-12);
        assert!(sequence_ratio("abc", "").abs() < 1e-12);
        assert!(sequence_ratio("", "abc").abs() < 1e-12);
    }

    #[test]
    fn sequence_ratio_disjoint_is_zero() {
        assert!(sequence_ratio("abc", "xyz").abs() < 1e-12);
    }

    #[test]
    fn partial_ratio_rewards_containment() {
        // "trading" appears verbatim inside "gulftrading".
        assert!((partial_ratio("trading", "gulftrading") - 100.0).abs() < 1e-9);
        assert!(partial_ratio("trading", "xyz") < 40.0);
    }

    #[test]
    fn token_set_ignores_order_and_duplicates() {
        let a = token_set_ratio("gulf trading", "trading gulf");
        assert!((a - 100.0).abs() < 1e-9);
        let b = token_set_ratio("gulf gulf trading", "gulf trading");
        assert!((b - 100.0).abs() < 1e-9);
    }

    #[test]
    fn token_set_empty_is_zero() {
        assert!(token_set_ratio("", "gulf").abs() < 1e-12);
        assert!(token_set_ratio("", "").abs() < 1e-12);
    }

    #[test]
    fn email_similarity_exact() {
        assert!((email_similarity("a@b.com", "a@b.com") - 100.0).abs() < 1e-9);
        assert!((email_similarity(" A@B.COM ", "a@b.com") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn email_similarity_rejects_malformed() {
        assert!(email_similarity("not-an-email", "a@b.com").abs() < 1e-12);
        assert!(email_similarity("a@@b.com", "a@b.com").abs() < 1e-12);
    }

    #[test]
    fn email_similarity_weighs_local_over_domain() {
        let same_local = email_similarity("info@gulftrading.ae", "info@gulfstar.ae");
        let same_domain = email_similarity("info@gulftrading.ae", "sales@gulftrading.ae");
        assert!(same_local > 60.0);
        assert!(same_domain > 20.0);
    }

    #[test]
    fn name_similarity_suffix_blind() {
        let m = TextMatcher::with_defaults();
        assert!((m.name_similarity("Acme LLC", "Acme LLC") - 1.0).abs() < 1e-12);
        assert!((m.name_similarity("Acme LLC", "ACME Limited") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn name_similarity_empty_after_normalization() {
        let m = TextMatcher::with_defaults();
        assert!(m.name_similarity("LLC", "Acme").abs() < 1e-12);
        assert!(m.name_similarity("", "").abs() < 1e-12);
    }

    #[test]
    fn name_similarity_weights_primary_tokens() {
        let m = TextMatcher::with_defaults();
        // Same first two tokens, different tail: at least the primary weight
        // survives.
        let s = m.name_similarity("Gulf Star Trading", "Gulf Star Logistics");
        assert!(s > NAME_WEIGHT_PRIMARY - 1e-9);
        assert!(s < 1.0);
    }

    #[test]
    fn domain_similarity_floors_on_containment() {
        let m = TextMatcher::with_defaults();
        let s = m.domain_similarity("Gulf Trading LLC", "gulftrading.ae");
        assert!(s >= 60.0, "expected containment floor, got {s}");
    }

    #[test]
    fn domain_similarity_unrelated_stays_low() {
        let m = TextMatcher::with_defaults();
        let s = m.domain_similarity("Pacific Ventures", "gulftrading.ae");
        assert!(s < 60.0, "unrelated domain scored {s}");
    }

    #[test]
    fn domain_similarity_case_insensitive() {
        let m = TextMatcher::with_defaults();
        let a = m.domain_similarity("Gulf Trading", "GULFTRADING.AE");
        let b = m.domain_similarity("gulf trading", "gulftrading.ae");
        assert!((a - b).abs() < 1e-9);
    }
}
