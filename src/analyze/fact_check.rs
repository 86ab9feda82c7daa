// src/analyze/fact_check.rs
//! Claim verification against retrieved references.
//!
//! The opening of the content is treated as the claim. Every reference is
//! asked whether it entails that claim, and the strongest support wins:
//! one corroborating source is enough to call a claim supported.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::warn;

use crate::config::FactCheckConfig;
use crate::models::EntailmentScorer;
use crate::signal::{round2, Reference, SignalModule, SignalResult};
use crate::text::truncate_chars;

pub struct FactChecker {
    model: Arc<dyn EntailmentScorer>,
    cfg: FactCheckConfig,
}

impl FactChecker {
    pub fn new(model: Arc<dyn EntailmentScorer>, cfg: FactCheckConfig) -> Self {
        Self { model, cfg }
    }

    fn verdict_for(&self, score: f64) -> &'static str {
        if score >= self.cfg.supported_threshold {
            "supported"
        } else if score >= self.cfg.partial_threshold {
            "partially_supported"
        } else {
            "unsupported"
        }
    }
}

#[async_trait]
impl SignalModule for FactChecker {
    async fn analyze(&self, text: &str, references: &[Reference]) -> Result<SignalResult> {
        let claim = truncate_chars(text.trim(), self.cfg.claim_chars);
        let premises: Vec<&str> = references
            .iter()
            .map(|r| truncate_chars(r.text.trim(), self.cfg.premise_chars))
            .filter(|p| !p.is_empty())
            .collect();
        if claim.is_empty() || premises.is_empty() {
            return Ok(SignalResult::new(
                "unverified",
                self.cfg.insufficient_score,
                "No reference articles were available to verify the claim.",
            ));
        }

        let mut best: Option<f64> = None;
        let mut last_err = None;
        for (i, premise) in premises.iter().enumerate() {
            let outcome = self.model.entailment(premise, claim).await.and_then(|p| {
                if p.is_finite() {
                    Ok(p)
                } else {
                    Err(anyhow!("entailment model returned a non-finite score"))
                }
            });
            match outcome {
                Ok(p) => {
                    let p = p.clamp(0.0, 1.0);
                    best = Some(best.map_or(p, |b| b.max(p)));
                }
                Err(e) => {
                    warn!(target: "fact_check", reference = i, error = %e, "entailment failed");
                    last_err = Some(e);
                }
            }
        }

        let Some(best) = best else {
            let cause = last_err.map(|e| format!("{e:#}")).unwrap_or_default();
            return Err(anyhow!("entailment failed for every reference: {cause}"));
        };
        let score = round2(best);
        Ok(SignalResult::new(
            self.verdict_for(score),
            score,
            format!(
                "Strongest support {:.2} across {} reference articles.",
                best,
                premises.len()
            ),
        ))
    }

    fn name(&self) -> &'static str {
        "fact_checker"
    }
}
