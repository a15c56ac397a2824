// src/fuzzy.rs
//! # Fuzzy Weighting
//!
//! Base weights express designer intent ("name match matters 15%"); the
//! triangular membership function de-rates a factor whose evidence is far
//! from saturated, so weak signals contribute less to the aggregate than
//! strong ones. A significant mismatch in any factor further suppresses
//! every provisional weight before renormalization.

use serde::Deserialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::factors::{Factor, FactorScores, FuzzyWeights};

/// Triangular membership parameters; `a <= b <= c`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MembershipParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for MembershipParams {
    fn default() -> Self {
        // Steep ramp: only near-perfect scores keep their full base weight.
        Self {
            a: 0.0,
            b: 0.9,
            c: 1.0,
        }
    }
}

/// Triangular membership: 0 at or below `a`, linear ramp up to `b`, linear
/// decay between `b` and `c`, and 1 at or above `c`. Degenerate ramps
/// (`a == b` or `b == c`) cannot divide by zero: the boundary checks
/// short-circuit first.
pub fn triangular_membership(x: f64, params: MembershipParams) -> f64 {
    let MembershipParams { a, b, c } = params;
    if x <= a {
        0.0
    } else if x >= c {
        1.0
    } else if x <= b {
        (x - a) / (b - a)
    } else {
        (c - x) / (c - b)
    }
}

/// True when any factor's evidence falls below the significance cutoff.
/// One rule for both the weighting and the aggregation step: all eight
/// factors are scanned.
pub fn significant_mismatch(factors: &FactorScores, cutoff: f64) -> bool {
    factors.iter().any(|(_, score)| score < cutoff)
}

/// Derive the fuzzy weight vector for one evaluation:
/// membership-modulated base weights, uniformly reduced under significant
/// mismatch, renormalized to sum to 1.0. If every provisional weight is
/// zero the vector stays all-zero rather than dividing by zero.
pub fn compute_weights(factors: &FactorScores, cfg: &EngineConfig) -> FuzzyWeights {
    let mut weights = FuzzyWeights::default();
    for factor in Factor::ALL {
        let mu = triangular_membership(factors.get(factor), cfg.membership.get(factor));
        weights.set(factor, mu * cfg.base_weights.get(factor));
    }

    if significant_mismatch(factors, cfg.mismatch.significance) {
        if let Some((factor, score)) = factors
            .iter()
            .find(|&(_, score)| score < cfg.mismatch.significance)
        {
            debug!(
                target: "legitimacy",
                factor = factor.key(),
                score,
                "significant mismatch; reducing provisional weights"
            );
        }
        for factor in Factor::ALL {
            weights.set(factor, weights.get(factor) * cfg.mismatch.weight_reduction);
        }
    }

    let total = weights.sum();
    if total > 0.0 {
        for factor in Factor::ALL {
            weights.set(factor, weights.get(factor) / total);
        }
    } else {
        debug!(
            target: "legitimacy",
            "all provisional weights zero; leaving weight vector unnormalized"
        );
    }

    weights
}
