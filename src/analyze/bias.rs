// src/analyze/bias.rs
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::{BiasClassifier, Classification};
use crate::signal::{percent, round2, Reference, SignalModule, SignalResult};

/// Bias signal: a neutral verdict counts for credibility, a biased one
/// against it, both weighted by the classifier's confidence.
pub struct BiasDetector {
    model: Arc<dyn BiasClassifier>,
}

impl BiasDetector {
    pub fn new(model: Arc<dyn BiasClassifier>) -> Self {
        Self { model }
    }
}

/// `neutral` keeps the confidence, any other label inverts it.
pub fn bias_contribution(c: &Classification) -> f64 {
    let conf = c.confidence.clamp(0.0, 1.0);
    if c.label == "neutral" {
        round2(conf)
    } else {
        round2(1.0 - conf)
    }
}

#[async_trait]
impl SignalModule for BiasDetector {
    async fn analyze(&self, text: &str, _references: &[Reference]) -> Result<SignalResult> {
        let c = self.model.classify_bias(text).await?;
        if !c.confidence.is_finite() {
            bail!("bias model returned a non-finite confidence");
        }
        Ok(SignalResult::new(
            c.label.clone(),
            bias_contribution(&c),
            format!(
                "Model classified the content as '{}' with confidence {}%",
                c.label,
                percent(c.confidence)
            ),
        ))
    }

    fn name(&self) -> &'static str {
        "bias_detector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, f64);

    #[async_trait]
    impl BiasClassifier for Fixed {
        async fn classify_bias(&self, _text: &str) -> Result<Classification> {
            Ok(Classification::new(self.0, self.1))
        }
    }

    async fn run(label: &'static str, conf: f64) -> SignalResult {
        BiasDetector::new(Arc::new(Fixed(label, conf)))
            .analyze("some text", &[])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn neutral_keeps_confidence() {
        let r = run("neutral", 0.9).await;
        assert_eq!(r.label, "neutral");
        assert_eq!(r.score, 0.9);
        assert_eq!(r.reason, "Model classified the content as 'neutral' with confidence 90.0%");
    }

    #[tokio::test]
    async fn biased_inverts_confidence() {
        let r = run("biased", 0.8).await;
        assert_eq!(r.label, "biased");
        assert_eq!(r.score, 0.2);
    }

    #[tokio::test]
    async fn nan_confidence_is_a_failure() {
        let r = BiasDetector::new(Arc::new(Fixed("neutral", f64::NAN)))
            .analyze("some text", &[])
            .await;
        assert!(r.unwrap_err().to_string().contains("non-finite"));
    }

    #[test]
    fn contribution_stays_in_unit_range() {
        assert_eq!(bias_contribution(&Classification::new("biased", 1.3)), 0.0);
        assert_eq!(bias_contribution(&Classification::new("neutral", -0.2)), 0.0);
    }
}
