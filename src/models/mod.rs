// src/models/mod.rs
//! Model backends behind small traits.
//!
//! Signal modules never talk to a model directly; they hold an `Arc<dyn …>`
//! from the [`ModelRegistry`], which is built once at start-up and shared
//! read-only by every request. Two interchangeable backends exist:
//! - [`huggingface::HuggingFaceClient`]: hosted inference over HTTP
//! - [`lexicon::LexiconModels`]: deterministic offline heuristics

pub mod huggingface;
pub mod lexicon;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::config::{ModelProvider, ModelsConfig};

/// Top label of a classifier with its confidence in `[0,1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f64,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Abstractive (or extractive) summary of one chunk of text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize_chunk(&self, chunk: &str, max_length: usize, min_length: usize)
        -> Result<String>;
}

/// Tone classifier (positive / negative / anything else).
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify_sentiment(&self, text: &str) -> Result<Classification>;
}

/// Two-way classifier over the labels `biased` / `neutral`.
#[async_trait]
pub trait BiasClassifier: Send + Sync {
    async fn classify_bias(&self, text: &str) -> Result<Classification>;
}

/// Probability in `[0,1]` that `premise` supports `hypothesis`.
#[async_trait]
pub trait EntailmentScorer: Send + Sync {
    async fn entailment(&self, premise: &str, hypothesis: &str) -> Result<f64>;
}

/// Similarity of `source` to each candidate, one value per candidate.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn similarities(&self, source: &str, candidates: &[&str]) -> Result<Vec<f64>>;
}

/// Process-wide model handles.
#[derive(Clone)]
pub struct ModelRegistry {
    pub provider: &'static str,
    pub summarizer: Arc<dyn Summarizer>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub bias: Arc<dyn BiasClassifier>,
    pub entailment: Arc<dyn EntailmentScorer>,
    pub similarity: Arc<dyn SimilarityScorer>,
}

impl ModelRegistry {
    /// Build the registry selected by `models.provider`.
    pub fn from_config(cfg: &ModelsConfig) -> Result<Self> {
        let registry = match cfg.provider {
            ModelProvider::HuggingFace => {
                let client = huggingface::HuggingFaceClient::new(cfg)?;
                Self::single_backend("huggingface", Arc::new(client))
            }
            ModelProvider::Local => Self::local(),
        };
        info!(target: "models", provider = registry.provider, "model registry ready");
        Ok(registry)
    }

    /// Offline registry backed by the lexicon heuristics.
    pub fn local() -> Self {
        Self::single_backend("local", Arc::new(lexicon::LexiconModels::new()))
    }

    fn single_backend<B>(provider: &'static str, backend: Arc<B>) -> Self
    where
        B: Summarizer
            + SentimentClassifier
            + BiasClassifier
            + EntailmentScorer
            + SimilarityScorer
            + 'static,
    {
        Self {
            provider,
            summarizer: backend.clone(),
            sentiment: backend.clone(),
            bias: backend.clone(),
            entailment: backend.clone(),
            similarity: backend,
        }
    }
}
