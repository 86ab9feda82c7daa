// src/report.rs
//! Evaluation output and its JSON wire shape.
//!
//! The browser extension reads `final_credibility_score`, the per-module
//! objects (`fact_check` uses `verdict` where the others use `label`) and
//! `related_articles`, so field names here are a contract.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::analyze::CredibilityResult;
use crate::signal::{Reference, SignalKind, SignalResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedArticle {
    pub title: String,
    pub url: String,
}

impl RelatedArticle {
    /// One entry per reference that carries a URL, in retrieval order.
    pub fn from_references(refs: &[Reference]) -> Vec<Self> {
        refs.iter()
            .filter_map(|r| {
                let url = r.url.as_deref()?.trim();
                if url.is_empty() {
                    return None;
                }
                let title = r
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(url);
                Some(RelatedArticle {
                    title: title.to_string(),
                    url: url.to_string(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub title: String,
    pub summary: String,
    pub credibility: CredibilityResult,
    pub fact_check: SignalResult,
    pub similarity: SignalResult,
    pub sentiment: SignalResult,
    pub bias: SignalResult,
    pub related_articles: Vec<RelatedArticle>,
}

impl AnalysisReport {
    pub fn final_score(&self) -> f64 {
        self.credibility.final_score
    }

    pub fn signal(&self, kind: SignalKind) -> &SignalResult {
        match kind {
            SignalKind::FactChecker => &self.fact_check,
            SignalKind::SimilarityChecker => &self.similarity,
            SignalKind::BiasDetector => &self.bias,
            SignalKind::SentimentAnalysis => &self.sentiment,
        }
    }
}

#[derive(Serialize)]
struct VerdictWire<'a> {
    verdict: &'a str,
    score: f64,
    explanation: &'a str,
}

#[derive(Serialize)]
struct LabelWire<'a> {
    label: &'a str,
    score: f64,
    explanation: &'a str,
}

impl<'a> From<&'a SignalResult> for VerdictWire<'a> {
    fn from(r: &'a SignalResult) -> Self {
        Self {
            verdict: &r.label,
            score: r.score,
            explanation: &r.reason,
        }
    }
}

impl<'a> From<&'a SignalResult> for LabelWire<'a> {
    fn from(r: &'a SignalResult) -> Self {
        Self {
            label: &r.label,
            score: r.score,
            explanation: &r.reason,
        }
    }
}

impl Serialize for AnalysisReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("AnalysisReport", 9)?;
        st.serialize_field("title", &self.title)?;
        st.serialize_field("summary", &self.summary)?;
        st.serialize_field("final_credibility_score", &self.credibility.final_score)?;
        st.serialize_field("credibility_breakdown", &self.credibility.breakdown)?;
        st.serialize_field("fact_check", &VerdictWire::from(&self.fact_check))?;
        st.serialize_field("similarity", &LabelWire::from(&self.similarity))?;
        st.serialize_field("sentiment", &LabelWire::from(&self.sentiment))?;
        st.serialize_field("bias", &LabelWire::from(&self.bias))?;
        st.serialize_field("related_articles", &self.related_articles)?;
        st.end()
    }
}

/// Returned instead of a report when the request cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub final_credibility_score: f64,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            final_credibility_score: 0.0,
        }
    }
}

/// Body of `POST /evaluate`: a report, or an error report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvaluateResponse {
    Report(Box<AnalysisReport>),
    Error(ErrorReport),
}
