//! Credibility aggregation.
//!
//! `final = Σ weight[m] * score[m]` over the four modules. Pure: no clamping,
//! no renormalization, no hidden state. A failed module simply arrives with
//! score 0.0 and keeps its weight.

use serde::Serialize;

use super::Weights;
use crate::signal::{round2, SignalKind};

/// One score per module, each expected in `[0,1]` (caller contract).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ModuleScores {
    pub fact_checker: f64,
    pub similarity_checker: f64,
    pub bias_detector: f64,
    pub sentiment_analysis: f64,
}

impl ModuleScores {
    pub fn get(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::FactChecker => self.fact_checker,
            SignalKind::SimilarityChecker => self.similarity_checker,
            SignalKind::BiasDetector => self.bias_detector,
            SignalKind::SentimentAnalysis => self.sentiment_analysis,
        }
    }
}

/// Score and weight of one module, exposed unchanged for auditability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ModuleContribution {
    pub score: f64,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CredibilityBreakdown {
    pub fact_checker: ModuleContribution,
    pub similarity_checker: ModuleContribution,
    pub bias_detector: ModuleContribution,
    pub sentiment_analysis: ModuleContribution,
}

impl CredibilityBreakdown {
    pub fn get(&self, kind: SignalKind) -> &ModuleContribution {
        match kind {
            SignalKind::FactChecker => &self.fact_checker,
            SignalKind::SimilarityChecker => &self.similarity_checker,
            SignalKind::BiasDetector => &self.bias_detector,
            SignalKind::SentimentAnalysis => &self.sentiment_analysis,
        }
    }

    /// Entries in breakdown order.
    pub fn iter(&self) -> impl Iterator<Item = (SignalKind, &ModuleContribution)> + '_ {
        SignalKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CredibilityResult {
    /// Weighted sum rounded to two decimals.
    pub final_score: f64,
    /// Unrounded weighted sum.
    #[serde(skip)]
    pub raw_score: f64,
    pub breakdown: CredibilityBreakdown,
}

/// Combine the four module scores with the weight table.
pub fn aggregate(scores: &ModuleScores, weights: &Weights) -> CredibilityResult {
    let contribution = |kind: SignalKind| ModuleContribution {
        score: scores.get(kind),
        weight: weights.get(kind),
    };
    let breakdown = CredibilityBreakdown {
        fact_checker: contribution(SignalKind::FactChecker),
        similarity_checker: contribution(SignalKind::SimilarityChecker),
        bias_detector: contribution(SignalKind::BiasDetector),
        sentiment_analysis: contribution(SignalKind::SentimentAnalysis),
    };

    let raw_score: f64 = breakdown.iter().map(|(_, c)| c.weight * c.score).sum();

    CredibilityResult {
        final_score: round2(raw_score),
        raw_score,
        breakdown,
    }
}
