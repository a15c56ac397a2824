// src/config.rs
//! # Engine Configuration
//!
//! Everything the scoring engine treats as policy rather than mechanism:
//! base weights, membership triangles, mismatch thresholds, level cutoffs
//! and the normalizer's token tables. Constructed once, passed explicitly
//! into [`crate::engine::LegitimacyEngine::new`], read-only afterwards.
//!
//! `Default` carries the stock scoring policy. TOML overrides are
//! partial: any omitted section or field keeps its default, so a config
//! file can adjust a single threshold without restating the rest.

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context};
use serde::Deserialize;
use tracing::info;

use crate::factors::Factor;
use crate::fuzzy::MembershipParams;
use crate::normalize::NormalizerTables;

pub const DEFAULT_CONFIG_PATH: &str = "config/legitimacy.toml";
pub const ENV_CONFIG_PATH: &str = "LEGITIMACY_CONFIG_PATH";

/// Static weight of each factor before fuzzy adjustment. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BaseWeights {
    pub name_similarity: f64,
    pub website_similarity: f64,
    pub contact_completeness: f64,
    pub location_completeness: f64,
    pub operational_completeness: f64,
    pub review_score: f64,
    pub profile_completeness: f64,
    pub region_confidence: f64,
}

impl Default for BaseWeights {
    fn default() -> Self {
        Self {
            name_similarity: 0.15,
            website_similarity: 0.15,
            contact_completeness: 0.15,
            location_completeness: 0.15,
            operational_completeness: 0.15,
            review_score: 0.15,
            profile_completeness: 0.10,
            region_confidence: 0.05,
        }
    }
}

impl BaseWeights {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::NameSimilarity => self.name_similarity,
            Factor::WebsiteSimilarity => self.website_similarity,
            Factor::ContactCompleteness => self.contact_completeness,
            Factor::LocationCompleteness => self.location_completeness,
            Factor::OperationalCompleteness => self.operational_completeness,
            Factor::ReviewScore => self.review_score,
            Factor::ProfileCompleteness => self.profile_completeness,
            Factor::RegionConfidence => self.region_confidence,
        }
    }

    pub fn sum(&self) -> f64 {
        Factor::ALL.iter().map(|&f| self.get(f)).sum()
    }
}

/// Per-factor triangular membership parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MembershipTable {
    pub name_similarity: MembershipParams,
    pub website_similarity: MembershipParams,
    pub contact_completeness: MembershipParams,
    pub location_completeness: MembershipParams,
    pub operational_completeness: MembershipParams,
    pub review_score: MembershipParams,
    pub profile_completeness: MembershipParams,
    pub region_confidence: MembershipParams,
}

impl MembershipTable {
    pub fn get(&self, factor: Factor) -> MembershipParams {
        match factor {
            Factor::NameSimilarity => self.name_similarity,
            Factor::WebsiteSimilarity => self.website_similarity,
            Factor::ContactCompleteness => self.contact_completeness,
            Factor::LocationCompleteness => self.location_completeness,
            Factor::OperationalCompleteness => self.operational_completeness,
            Factor::ReviewScore => self.review_score,
            Factor::ProfileCompleteness => self.profile_completeness,
            Factor::RegionConfidence => self.region_confidence,
        }
    }
}

/// Significant-mismatch policy. The weight and score reductions compound
/// deliberately (0.5 × 0.7 ≈ 0.35 effective) and are configurable
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MismatchThresholds {
    /// A factor below this score flags a significant mismatch.
    pub significance: f64,
    /// Uniform multiplier applied to every provisional weight on mismatch.
    pub weight_reduction: f64,
    /// Multiplier applied to the aggregated score on mismatch.
    pub score_reduction: f64,
}

impl Default for MismatchThresholds {
    fn default() -> Self {
        Self {
            significance: 0.7,
            weight_reduction: 0.5,
            score_reduction: 0.7,
        }
    }
}

/// Cutoffs mapping the final [0,1] score to a legitimacy level.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            high: 0.8,
            moderate: 0.6,
            low: 0.4,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub base_weights: BaseWeights,
    pub membership: MembershipTable,
    pub mismatch: MismatchThresholds,
    pub levels: LevelThresholds,
    pub normalizer: NormalizerTables,
}

impl EngineConfig {
    /// Parse a (possibly partial) TOML override and validate the result.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: EngineConfig = toml::from_str(toml_str).context("invalid legitimacy config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from the file named by `LEGITIMACY_CONFIG_PATH`, defaulting to
    /// `config/legitimacy.toml`.
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let content = fs::read_to_string(&path).with_context(|| {
            format!("failed to read legitimacy config at {}", path.display())
        })?;
        let cfg = Self::from_toml_str(&content)?;
        info!(target: "legitimacy", path = %path.display(), "loaded engine config");
        Ok(cfg)
    }

    /// Reject configurations the engine cannot score with.
    pub fn validate(&self) -> anyhow::Result<()> {
        for factor in Factor::ALL {
            let w = self.base_weights.get(factor);
            ensure!(
                w.is_finite() && (0.0..=1.0).contains(&w),
                "base weight for {} out of range: {w}",
                factor.key()
            );

            let m = self.membership.get(factor);
            ensure!(
                m.a.is_finite() && m.b.is_finite() && m.c.is_finite(),
                "membership params for {} must be finite",
                factor.key()
            );
            ensure!(
                m.a <= m.b && m.b <= m.c,
                "membership params for {} must satisfy a <= b <= c (got {}, {}, {})",
                factor.key(),
                m.a,
                m.b,
                m.c
            );
        }

        let total = self.base_weights.sum();
        ensure!(
            (total - 1.0).abs() < 1e-6,
            "base weights must sum to 1.0 (got {total})"
        );

        for (name, value) in [
            ("mismatch.significance", self.mismatch.significance),
            ("mismatch.weight_reduction", self.mismatch.weight_reduction),
            ("mismatch.score_reduction", self.mismatch.score_reduction),
            ("levels.high", self.levels.high),
            ("levels.moderate", self.levels.moderate),
            ("levels.low", self.levels.low),
        ] {
            ensure!(
                value.is_finite() && (0.0..=1.0).contains(&value),
                "{name} out of range: {value}"
            );
        }
        ensure!(
            self.levels.low <= self.levels.moderate && self.levels.moderate <= self.levels.high,
            "level cutoffs must be ordered low <= moderate <= high"
        );

        Ok(())
    }
}
