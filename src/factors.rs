// src/factors.rs
//! # Evidence Factors
//!
//! The eight dimensions of evidence about a record's legitimacy, as a
//! closed enum, plus the extractor that maps a raw [`BusinessRecord`] into
//! normalized per-factor scores in [0,1].
//!
//! Factor score containers are fixed-size arrays indexed by the enum, so a
//! missing factor is a compile-time error rather than a silent zero from a
//! string-keyed map.

use serde::{Deserialize, Serialize};

use crate::record::BusinessRecord;
use crate::similarity::TextMatcher;

/// One dimension of evidence about record legitimacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    NameSimilarity,
    WebsiteSimilarity,
    ContactCompleteness,
    LocationCompleteness,
    OperationalCompleteness,
    ReviewScore,
    ProfileCompleteness,
    RegionConfidence,
}

impl Factor {
    pub const COUNT: usize = 8;

    /// All factors, in declaration (reporting) order.
    pub const ALL: [Factor; Factor::COUNT] = [
        Factor::NameSimilarity,
        Factor::WebsiteSimilarity,
        Factor::ContactCompleteness,
        Factor::LocationCompleteness,
        Factor::OperationalCompleteness,
        Factor::ReviewScore,
        Factor::ProfileCompleteness,
        Factor::RegionConfidence,
    ];

    /// Stable snake_case key used in serialized breakdowns and config files.
    pub fn key(self) -> &'static str {
        match self {
            Factor::NameSimilarity => "name_similarity",
            Factor::WebsiteSimilarity => "website_similarity",
            Factor::ContactCompleteness => "contact_completeness",
            Factor::LocationCompleteness => "location_completeness",
            Factor::OperationalCompleteness => "operational_completeness",
            Factor::ReviewScore => "review_score",
            Factor::ProfileCompleteness => "profile_completeness",
            Factor::RegionConfidence => "region_confidence",
        }
    }
}

/// Fixed-size factor-to-value table. Used both for extracted scores and
/// for derived fuzzy weights.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FactorTable {
    values: [f64; Factor::COUNT],
}

/// Per-factor scores in [0,1], one evaluation's worth.
pub type FactorScores = FactorTable;
/// Membership-modulated, renormalized weights summing to 1.0 (or all zero
/// in the degenerate case).
pub type FuzzyWeights = FactorTable;

impl FactorTable {
    pub fn get(&self, factor: Factor) -> f64 {
        self.values[factor as usize]
    }

    pub fn set(&mut self, factor: Factor, value: f64) {
        self.values[factor as usize] = value;
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.iter().map(move |&f| (f, self.get(f)))
    }
}

/// The fields a complete business profile is expected to carry.
const REQUIRED_FIELD_COUNT: f64 = 7.0;

/// Map a raw record into the eight factor scores. Pure and total: absent
/// or malformed fields contribute 0, never an error.
pub fn extract_factors(
    record: &BusinessRecord,
    query_name: &str,
    matcher: &TextMatcher,
) -> FactorScores {
    let mut scores = FactorScores::default();

    scores.set(
        Factor::NameSimilarity,
        matcher.name_similarity(query_name, record.name.as_deref().unwrap_or("")),
    );

    scores.set(Factor::WebsiteSimilarity, website_similarity(record, query_name, matcher));

    scores.set(
        Factor::ContactCompleteness,
        half(record.has_phone()) + half(record.has_valid_website()),
    );

    scores.set(
        Factor::LocationCompleteness,
        half(record.has_address()) + half(record.has_coordinates()),
    );

    scores.set(
        Factor::OperationalCompleteness,
        half(record.has_hours()) + half(record.is_operational()),
    );

    scores.set(Factor::ReviewScore, review_score(record));

    scores.set(
        Factor::ProfileCompleteness,
        required_fields_present(record) as f64 / REQUIRED_FIELD_COUNT,
    );

    scores.set(Factor::RegionConfidence, region_confidence(record));

    scores
}

fn half(present: bool) -> f64 {
    if present {
        0.5
    } else {
        0.0
    }
}

fn website_similarity(record: &BusinessRecord, query_name: &str, matcher: &TextMatcher) -> f64 {
    if !record.has_valid_website() {
        return 0.0;
    }
    let website = record.website.as_deref().unwrap_or("");
    let domain = matcher.domain_from_url(website);
    if domain.is_empty() {
        return 0.0;
    }
    matcher.domain_similarity(query_name, &domain) / 100.0
}

/// Rating carries 70% of the review signal; the count contributes a step
/// bonus that saturates at 100 reviews.
fn review_score(record: &BusinessRecord) -> f64 {
    let (rating, count) = match (record.rating, record.user_ratings_total) {
        (Some(r), Some(n)) if r != 0.0 && n > 0 => (r, n),
        _ => return 0.0,
    };

    let rating_component = (rating / 5.0) * 0.7;
    let count_component = match count {
        n if n >= 100 => 0.3,
        n if n >= 50 => 0.2,
        n if n >= 25 => 0.15,
        n if n >= 10 => 0.1,
        _ => 0.05,
    };

    rating_component + count_component
}

fn required_fields_present(record: &BusinessRecord) -> usize {
    [
        record.has_name(),
        record.has_address(),
        record.has_phone(),
        record.has_website(),
        record.has_hours(),
        record.has_rating(),
        record.has_reviews(),
    ]
    .into_iter()
    .filter(|&p| p)
    .count()
}

fn region_confidence(record: &BusinessRecord) -> f64 {
    match &record.region_validation {
        Some(v) if v.is_valid => 1.0,
        Some(v) if v.confidence.as_deref() == Some("high") => 0.5,
        _ => 0.0,
    }
}
