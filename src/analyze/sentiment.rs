// src/analyze/sentiment.rs
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::SentimentClassifier;
use crate::signal::{percent, Reference, SignalModule, SignalResult};
use crate::text::truncate_chars;

/// Longest prefix handed to the classifier.
pub const MAX_INPUT_CHARS: usize = 512;

/// Tone signal. Only the label counts; confidence ends up in the reason.
pub struct SentimentAnalysis {
    model: Arc<dyn SentimentClassifier>,
}

impl SentimentAnalysis {
    pub fn new(model: Arc<dyn SentimentClassifier>) -> Self {
        Self { model }
    }
}

pub fn tone_contribution(label: &str) -> f64 {
    match label {
        "positive" => 0.7,
        "negative" => 0.3,
        _ => 0.5,
    }
}

#[async_trait]
impl SignalModule for SentimentAnalysis {
    async fn analyze(&self, text: &str, _references: &[Reference]) -> Result<SignalResult> {
        let input = truncate_chars(text, MAX_INPUT_CHARS);
        let c = self.model.classify_sentiment(input).await?;
        let label = c.label.to_lowercase();
        Ok(SignalResult::new(
            label.clone(),
            tone_contribution(&label),
            format!(
                "The model classified the tone as '{}' with confidence {}%",
                label,
                percent(c.confidence)
            ),
        ))
    }

    fn name(&self) -> &'static str {
        "sentiment_analysis"
    }
}
