// src/signal.rs
//! Signal contract shared by every analysis module.
//!
//! A module turns text (and, for the cross-checking modules, a set of
//! retrieved reference documents) into a [`SignalResult`]: a label, a
//! direction-normalized contribution in `[0,1]` (higher = more credible)
//! and a human-readable reason.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label carried by a result that stands in for a failed module.
pub const ERROR_LABEL: &str = "error";

/// The four modules that feed the credibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    FactChecker,
    SimilarityChecker,
    BiasDetector,
    SentimentAnalysis,
}

impl SignalKind {
    /// Breakdown order.
    pub const ALL: [SignalKind; 4] = [
        SignalKind::FactChecker,
        SignalKind::SimilarityChecker,
        SignalKind::BiasDetector,
        SignalKind::SentimentAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::FactChecker => "fact_checker",
            SignalKind::SimilarityChecker => "similarity_checker",
            SignalKind::BiasDetector => "bias_detector",
            SignalKind::SentimentAnalysis => "sentiment_analysis",
        }
    }

    /// Title-cased name for console tables.
    pub fn display_name(&self) -> &'static str {
        match self {
            SignalKind::FactChecker => "Fact Checker",
            SignalKind::SimilarityChecker => "Similarity Checker",
            SignalKind::BiasDetector => "Bias Detector",
            SignalKind::SentimentAnalysis => "Sentiment Analysis",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one signal module. `score` is already a contribution, never a
/// raw model confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub label: String,
    pub score: f64,
    pub reason: String,
}

impl SignalResult {
    pub fn new(label: impl Into<String>, score: f64, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            score,
            reason: reason.into(),
        }
    }

    /// Stand-in for a module that failed: zero contribution, error label.
    pub fn error(reason: impl Into<String>) -> Self {
        Self::new(ERROR_LABEL, 0.0, reason)
    }

    pub fn is_error(&self) -> bool {
        self.label == ERROR_LABEL
    }
}

/// A retrieved reference document. Modules only look at `text`; title and
/// url feed the related-articles list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub text: String,
}

impl Reference {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            title: None,
            url: None,
            text: text.into(),
        }
    }
}

/// Pluggable analysis unit. Implementations report failures as `Err`; the
/// pipeline converts them into [`SignalResult::error`].
#[async_trait]
pub trait SignalModule: Send + Sync {
    async fn analyze(&self, text: &str, references: &[Reference]) -> anyhow::Result<SignalResult>;

    /// Module name for logs and metrics.
    fn name(&self) -> &'static str;
}

/// Round to two decimals (display precision of every score).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Model confidence as a percentage for reasons: the confidence is rounded
/// to two decimals first, so 0.9876 reads as "99.0".
pub fn percent(confidence: f64) -> String {
    format!("{:.1}", round2(round2(confidence) * 100.0))
}
