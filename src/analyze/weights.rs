//! Aggregation weights: one fixed weight per signal module.
//!
//! The table is policy, not law. `Weights::DEFAULT` is the shipped set; the
//! `[weights]` table of `config/credibility.toml` may replace it:
//!
//! ```toml
//! [weights]
//! fact_checker = 0.4
//! similarity_checker = 0.3
//! bias_detector = 0.15
//! sentiment_analysis = 0.15
//! ```
//!
//! Every accepted table sums to 1.0, so a weighted sum of `[0,1]` scores
//! stays in `[0,1]` even when failed modules contribute 0.0.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::signal::SignalKind;

/// Allowed drift of the weight sum from 1.0.
pub const SUM_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    pub fact_checker: f64,
    pub similarity_checker: f64,
    pub bias_detector: f64,
    pub sentiment_analysis: f64,
}

impl Weights {
    pub const DEFAULT: Weights = Weights {
        fact_checker: 0.4,
        similarity_checker: 0.3,
        bias_detector: 0.15,
        sentiment_analysis: 0.15,
    };

    pub fn get(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::FactChecker => self.fact_checker,
            SignalKind::SimilarityChecker => self.similarity_checker,
            SignalKind::BiasDetector => self.bias_detector,
            SignalKind::SentimentAnalysis => self.sentiment_analysis,
        }
    }

    pub fn sum(&self) -> f64 {
        SignalKind::ALL.iter().map(|k| self.get(*k)).sum()
    }

    /// Reject tables that would break the `[0,1]` range of the final score.
    pub fn validate(self) -> Result<Self> {
        for kind in SignalKind::ALL {
            let w = self.get(kind);
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                bail!("weight for {kind} must be within [0,1], got {w}");
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            bail!("weights must sum to 1.0, got {sum}");
        }
        Ok(self)
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}
