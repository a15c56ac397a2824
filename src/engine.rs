// src/engine.rs
//! # Legitimacy Engine
//! Pure, testable logic that maps `(record, query)` → `LegitimacyResult`.
//! No I/O, suitable for unit tests and batch evaluation.
//!
//! Policy: factor scores are blended under fuzzy weights; a significant
//! mismatch in any factor reduces the aggregate and bars the High level.
//! Strong pillars must not mask a single critical failure.

use tracing::debug;

use crate::config::EngineConfig;
use crate::factors::{extract_factors, Factor, FactorScores};
use crate::fuzzy::{compute_weights, significant_mismatch};
use crate::record::{BusinessRecord, CompanyQuery};
use crate::report::{round2, FactorPercentages, LegitimacyLevel, LegitimacyResult};
use crate::similarity::TextMatcher;

/// The scoring engine. Owns its configuration and matcher; every method is
/// `&self` with no interior mutability, so one engine can score many
/// records concurrently.
#[derive(Debug, Clone)]
pub struct LegitimacyEngine {
    cfg: EngineConfig,
    matcher: TextMatcher,
}

impl LegitimacyEngine {
    pub fn new(cfg: EngineConfig) -> Self {
        let matcher = TextMatcher::new(&cfg.normalizer);
        Self { cfg, matcher }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn matcher(&self) -> &TextMatcher {
        &self.matcher
    }

    /// Evaluate one record against one query.
    pub fn evaluate(&self, record: &BusinessRecord, query: &CompanyQuery) -> LegitimacyResult {
        let factors = extract_factors(record, &query.name, &self.matcher);
        self.score_factors(&factors)
    }

    /// Score an already-extracted factor vector. Exposed for hosts that
    /// assemble factors from their own sources.
    pub fn score_factors(&self, factors: &FactorScores) -> LegitimacyResult {
        let weights = compute_weights(factors, &self.cfg);
        let mismatch = significant_mismatch(factors, self.cfg.mismatch.significance);

        let mut raw: f64 = Factor::ALL
            .iter()
            .map(|&f| factors.get(f) * weights.get(f))
            .sum();

        if mismatch {
            raw *= self.cfg.mismatch.score_reduction;
            debug!(
                target: "legitimacy",
                score = raw,
                reduction = self.cfg.mismatch.score_reduction,
                "significant mismatch; overall score reduced"
            );
        }

        let level = self.classify(raw, mismatch);

        LegitimacyResult {
            total_score: round2(raw * 100.0),
            legitimacy_level: level,
            breakdown: FactorPercentages::from_unit(factors),
            weights: FactorPercentages::from_unit(&weights),
        }
    }

    fn classify(&self, raw: f64, mismatch: bool) -> LegitimacyLevel {
        let levels = &self.cfg.levels;
        if raw >= levels.high && !mismatch {
            LegitimacyLevel::High
        } else if raw >= levels.moderate {
            LegitimacyLevel::Moderate
        } else if raw >= levels.low {
            LegitimacyLevel::Low
        } else {
            LegitimacyLevel::VeryLow
        }
    }
}

impl Default for LegitimacyEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(entries: &[(Factor, f64)]) -> FactorScores {
        let mut t = FactorScores::default();
        for &(f, v) in entries {
            t.set(f, v);
        }
        t
    }

    fn saturated() -> FactorScores {
        let mut t = FactorScores::default();
        for f in Factor::ALL {
            t.set(f, 1.0);
        }
        t
    }

    #[test]
    fn saturated_factors_score_high() {
        let engine = LegitimacyEngine::default();
        let result = engine.score_factors(&saturated());
        assert_eq!(result.legitimacy_level, LegitimacyLevel::High);
        assert!((result.total_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn mismatch_bars_high_level() {
        let engine = LegitimacyEngine::default();
        let mut t = saturated();
        // One weak pillar, everything else perfect.
        t.set(Factor::RegionConfidence, 0.5);
        let result = engine.score_factors(&t);
        assert_ne!(result.legitimacy_level, LegitimacyLevel::High);
    }

    #[test]
    fn mismatch_applies_score_reduction() {
        let engine = LegitimacyEngine::default();
        // All factors at 0.69: just below the cutoff everywhere.
        let mut t = FactorScores::default();
        for f in Factor::ALL {
            t.set(f, 0.69);
        }
        let result = engine.score_factors(&t);
        // Weights renormalize back to the base split, so the aggregate is
        // 0.69 * 0.7 = 0.483.
        assert!((result.total_score - 48.3).abs() < 0.01);
        assert_eq!(result.legitimacy_level, LegitimacyLevel::Low);
    }

    #[test]
    fn all_zero_factors_score_zero() {
        let engine = LegitimacyEngine::default();
        let result = engine.score_factors(&FactorScores::default());
        assert!(result.total_score.abs() < 1e-12);
        assert_eq!(result.legitimacy_level, LegitimacyLevel::VeryLow);
        for (_, w) in result.weights.iter() {
            assert!(w.abs() < 1e-12);
        }
    }

    #[test]
    fn classification_boundaries() {
        let engine = LegitimacyEngine::default();
        // No mismatch requires every factor >= 0.7; drive the aggregate by
        // varying a uniform score.
        for (score, expected) in [
            (1.0, LegitimacyLevel::High),
            (0.85, LegitimacyLevel::High),
            (0.75, LegitimacyLevel::Moderate),
        ] {
            let mut t = FactorScores::default();
            for f in Factor::ALL {
                t.set(f, score);
            }
            let result = engine.score_factors(&t);
            assert_eq!(result.legitimacy_level, expected, "score {score}");
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let engine = LegitimacyEngine::default();
        let t = factors(&[
            (Factor::NameSimilarity, 0.83),
            (Factor::ProfileCompleteness, 3.0 / 7.0),
            (Factor::ReviewScore, 0.41),
        ]);
        let a = engine.score_factors(&t);
        let b = engine.score_factors(&t);
        assert_eq!(a, b);
    }

    #[test]
    fn custom_level_cutoffs_respected() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [levels]
            high = 0.95
            "#,
        )
        .unwrap();
        let engine = LegitimacyEngine::new(cfg);
        let mut t = FactorScores::default();
        for f in Factor::ALL {
            t.set(f, 0.9);
        }
        // Aggregate 0.9 with no mismatch: High by default cutoffs, but not
        // against a 0.95 bar.
        let result = engine.score_factors(&t);
        assert_eq!(result.legitimacy_level, LegitimacyLevel::Moderate);
    }
}
