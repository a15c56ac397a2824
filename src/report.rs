// src/report.rs
//! # Legitimacy Report
//!
//! The value the engine hands back: overall score on a 0–100 scale, a
//! categorical level, and per-factor breakdowns of scores and fuzzy
//! weights (also in percent, rounded to two decimals like the upstream
//! consumers expect). Serializable so hosts can persist or transmit it;
//! the core itself does neither.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::config::BaseWeights;
use crate::factors::{Factor, FactorTable};

/// Categorical legitimacy bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
pub enum LegitimacyLevel {
    High,
    Moderate,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl fmt::Display for LegitimacyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LegitimacyLevel::High => "High",
            LegitimacyLevel::Moderate => "Moderate",
            LegitimacyLevel::Low => "Low",
            LegitimacyLevel::VeryLow => "Very Low",
        };
        f.write_str(s)
    }
}

/// Per-factor values on a 0–100 scale, rounded to two decimals.
/// Serializes as a map keyed by the factor's snake_case key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorPercentages {
    values: [f64; Factor::COUNT],
}

impl FactorPercentages {
    pub(crate) fn from_unit(table: &FactorTable) -> Self {
        let mut values = [0.0; Factor::COUNT];
        for (factor, value) in table.iter() {
            values[factor as usize] = round2(value * 100.0);
        }
        Self { values }
    }

    pub fn get(&self, factor: Factor) -> f64 {
        self.values[factor as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.iter().map(move |&f| (f, self.get(f)))
    }
}

impl Serialize for FactorPercentages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Factor::COUNT))?;
        for (factor, value) in self.iter() {
            map.serialize_entry(factor.key(), &value)?;
        }
        map.end()
    }
}

/// Complete outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LegitimacyResult {
    /// Overall score in [0,100], rounded to two decimals.
    pub total_score: f64,
    pub legitimacy_level: LegitimacyLevel,
    /// Factor scores × 100.
    pub breakdown: FactorPercentages,
    /// Fuzzy weights × 100.
    pub weights: FactorPercentages,
}

impl LegitimacyResult {
    /// Factors whose breakdown score falls below `cutoff_pct` (a 0–100
    /// percentage), in reporting order. What a host would flag as
    /// "needs improvement".
    pub fn weak_factors(&self, cutoff_pct: f64) -> Vec<Factor> {
        Factor::ALL
            .iter()
            .copied()
            .filter(|&f| self.breakdown.get(f) < cutoff_pct)
            .collect()
    }

    /// Per-factor difference between the fuzzy weight and the base weight,
    /// in percentage points. Positive means the factor gained influence.
    pub fn weight_adjustments(&self, base: &BaseWeights) -> Vec<(Factor, f64)> {
        Factor::ALL
            .iter()
            .map(|&f| (f, round2(self.weights.get(f) - base.get(f) * 100.0)))
            .collect()
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
