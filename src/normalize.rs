// src/normalize.rs
//! # Name Normalization
//!
//! Canonicalizes free-text business names so that "Al Noor Trading L.L.C."
//! and "al noor trading" compare equal:
//!
//! - Lower-cases and trims.
//! - Replaces punctuation with spaces, collapses whitespace runs.
//! - Expands abbreviations ("mgmt" → "management"); legal-form tokens
//!   expand to nothing.
//! - Drops legal-entity suffixes ("llc", "limited", "holdings", ...).
//!
//! Expansion runs before the suffix filter so that an abbreviation whose
//! expansion is itself a suffix ("corp" → "corporation") is removed in the
//! same pass, making `normalize` idempotent.
//!
//! Suffix and abbreviation tables are configurable; `NormalizerTables`
//! carries them and its `Default` reproduces the built-in lists.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("non-word regex"));

/// Legal-entity suffixes dropped from business names. Order matters for
/// domain-label stripping ("holdings" must precede "holding").
const DEFAULT_SUFFIXES: &[&str] = &[
    "llc",
    "ltd",
    "inc",
    "plc",
    "gmbh",
    "pty",
    "corporation",
    "company",
    "group",
    "holdings",
    "holding",
    "limited",
    "incorporated",
];

/// Abbreviation expansions. Legal-form tokens map to the empty string and
/// disappear; multi-word expansions ("fz" → "free zone") re-tokenize.
const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("mgmt", "management"),
    ("llc", ""),
    ("ltd", ""),
    ("co", "company"),
    ("corp", "corporation"),
    ("inc", ""),
    ("plc", ""),
    ("gmbh", ""),
    ("pty", ""),
    ("&", "and"),
    ("fz", "free zone"),
    ("fzc", "free zone company"),
];

/// Token tables the normalizer runs on. Overridable via configuration;
/// defaults reproduce the built-in suffix and abbreviation lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizerTables {
    pub suffixes: Vec<String>,
    pub abbreviations: HashMap<String, String>,
}

impl Default for NormalizerTables {
    fn default() -> Self {
        Self {
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            abbreviations: DEFAULT_ABBREVIATIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Canonicalizes business names for comparison. Cheap to clone; construct
/// once per engine and reuse across evaluations.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    suffixes: Vec<String>,
    abbreviations: HashMap<String, String>,
}

impl NameNormalizer {
    pub fn new(tables: &NormalizerTables) -> Self {
        Self {
            suffixes: tables.suffixes.clone(),
            abbreviations: tables.abbreviations.clone(),
        }
    }

    /// The configured suffix list, in stripping order.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Canonicalize a business name. Total: any input yields a (possibly
    /// empty) string, never an error.
    pub fn normalize(&self, name: &str) -> String {
        let lowered = name.trim().to_lowercase();
        let spaced = NON_WORD.replace_all(&lowered, " ");

        let mut tokens: Vec<String> = Vec::new();
        for tok in spaced.split_whitespace() {
            match self.abbreviations.get(tok) {
                Some(expansion) => {
                    tokens.extend(expansion.split_whitespace().map(str::to_string));
                }
                None => tokens.push(tok.to_string()),
            }
        }
        tokens.retain(|t| !self.suffixes.iter().any(|s| s == t));

        tokens.join(" ")
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(&NormalizerTables::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        NameNormalizer::default().normalize(s)
    }

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(norm("  Gulf Trading  "), "gulf trading");
    }

    #[test]
    fn strips_punctuation_and_collapses_whitespace() {
        assert_eq!(norm("Al-Noor   Trading, Est."), "al noor trading est");
    }

    #[test]
    fn drops_entity_suffixes() {
        assert_eq!(norm("Acme LLC"), "acme");
        assert_eq!(norm("Acme Holdings Limited"), "acme");
        assert_eq!(norm("Emirates Trading Company"), "emirates trading");
    }

    #[test]
    fn expands_abbreviations() {
        assert_eq!(norm("Noor Mgmt"), "noor management");
        assert_eq!(norm("Jebel Ali FZ"), "jebel ali free zone");
    }

    #[test]
    fn expansion_of_suffix_abbreviation_is_dropped() {
        // "corp" expands to "corporation", which is itself a suffix.
        assert_eq!(norm("Acme Corp"), "acme");
    }

    #[test]
    fn idempotent() {
        for s in ["Acme Corp", "Gulf Star Trading L.L.C.", "Noor Mgmt FZC", ""] {
            let once = norm(s);
            assert_eq!(norm(&once), once, "normalize not idempotent for {s:?}");
        }
    }

    #[test]
    fn empty_and_punctuation_only_inputs() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("-- // --"), "");
        assert_eq!(norm("LLC"), "");
    }

    #[test]
    fn custom_tables_are_honored() {
        let tables = NormalizerTables {
            suffixes: vec!["est".into()],
            abbreviations: [("intl".to_string(), "international".to_string())]
                .into_iter()
                .collect(),
        };
        let n = NameNormalizer::new(&tables);
        assert_eq!(n.normalize("Noor Intl Est"), "noor international");
        // Default suffixes no longer apply.
        assert_eq!(n.normalize("Acme LLC"), "acme llc");
    }
}
