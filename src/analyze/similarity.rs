// src/analyze/similarity.rs
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::config::SimilarityConfig;
use crate::models::SimilarityScorer;
use crate::signal::{round2, Reference, SignalModule, SignalResult};
use crate::text::truncate_chars;

/// How closely the content tracks what other outlets wrote about the topic.
pub struct SimilarityChecker {
    model: Arc<dyn SimilarityScorer>,
    cfg: SimilarityConfig,
}

impl SimilarityChecker {
    pub fn new(model: Arc<dyn SimilarityScorer>, cfg: SimilarityConfig) -> Self {
        Self { model, cfg }
    }

    fn label_for(&self, score: f64) -> &'static str {
        if score >= self.cfg.high_threshold {
            "highly_similar"
        } else if score >= self.cfg.partial_threshold {
            "partially_similar"
        } else {
            "dissimilar"
        }
    }
}

#[async_trait]
impl SignalModule for SimilarityChecker {
    async fn analyze(&self, text: &str, references: &[Reference]) -> Result<SignalResult> {
        let candidates: Vec<&str> = references
            .iter()
            .map(|r| truncate_chars(r.text.trim(), self.cfg.reference_chars))
            .filter(|t| !t.is_empty())
            .collect();
        if candidates.is_empty() {
            return Ok(SignalResult::new(
                "insufficient_data",
                self.cfg.insufficient_score,
                "No reference articles were available for comparison.",
            ));
        }

        let source = truncate_chars(text, self.cfg.reference_chars);
        let sims = self.model.similarities(source, &candidates).await?;
        if sims.len() != candidates.len() {
            bail!(
                "similarity backend returned {} values for {} references",
                sims.len(),
                candidates.len()
            );
        }

        if sims.iter().any(|s| !s.is_finite()) {
            bail!("similarity backend returned a non-finite score");
        }

        let mean = sims.iter().map(|s| s.clamp(0.0, 1.0)).sum::<f64>() / sims.len() as f64;
        let score = round2(mean);
        Ok(SignalResult::new(
            self.label_for(score),
            score,
            format!(
                "Average similarity {:.2} across {} reference articles.",
                mean,
                sims.len()
            ),
        ))
    }

    fn name(&self) -> &'static str {
        "similarity_checker"
    }
}
