// src/models/huggingface.rs
//! Hosted inference through the Hugging Face Inference API.
//!
//! One `reqwest::Client` serves every task; each call is a single POST to
//! `{api_base}/{model_id}`. Response shapes differ slightly between the
//! classic and the router deployments, so the decoders accept both.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{
    BiasClassifier, Classification, EntailmentScorer, SentimentClassifier, SimilarityScorer,
    Summarizer,
};
use crate::config::ModelsConfig;

/// Candidate labels of the zero-shot bias classifier.
pub const BIAS_LABELS: [&str; 2] = ["biased", "neutral"];
/// Sentiment models see at most this many characters.
pub const SENTIMENT_INPUT_CHARS: usize = 512;

pub struct HuggingFaceClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    summarization_model: String,
    sentiment_model: String,
    zero_shot_model: String,
    similarity_model: String,
}

impl HuggingFaceClient {
    pub fn new(cfg: &ModelsConfig) -> Result<Self> {
        let api_key = cfg.resolved_api_key()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("credibility-analyzer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("building inference http client")?;
        Ok(Self {
            http,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            api_key,
            summarization_model: cfg.summarization_model.clone(),
            sentiment_model: cfg.sentiment_model.clone(),
            zero_shot_model: cfg.zero_shot_model.clone(),
            similarity_model: cfg.similarity_model.clone(),
        })
    }

    async fn post<T: DeserializeOwned>(&self, model: &str, body: Value) -> Result<T> {
        let url = format!("{}/{}", self.api_base, model);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("calling inference model {model}"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!(
                "inference model {model} returned {status}: {}",
                crate::text::truncate_chars(text.trim(), 200)
            );
        }
        let out = resp
            .json::<T>()
            .await
            .with_context(|| format!("decoding response of model {model}"))?;
        debug!(target: "models", model, "inference call ok");
        Ok(out)
    }

    async fn zero_shot(
        &self,
        input: &str,
        labels: &[&str],
        multi_label: bool,
        hypothesis_template: Option<&str>,
    ) -> Result<Vec<LabelScore>> {
        let mut parameters = json!({
            "candidate_labels": labels,
            "multi_label": multi_label,
        });
        if let Some(t) = hypothesis_template {
            parameters["hypothesis_template"] = json!(t);
        }
        let resp: ZeroShotResponse = self
            .post(
                &self.zero_shot_model,
                json!({ "inputs": input, "parameters": parameters }),
            )
            .await?;
        Ok(resp.into_ranked())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Classic { labels: Vec<String>, scores: Vec<f64> },
    Ranked(Vec<LabelScore>),
}

impl ZeroShotResponse {
    /// Labels sorted by descending score.
    fn into_ranked(self) -> Vec<LabelScore> {
        let mut out = match self {
            ZeroShotResponse::Classic { labels, scores } => labels
                .into_iter()
                .zip(scores)
                .map(|(label, score)| LabelScore { label, score })
                .collect(),
            ZeroShotResponse::Ranked(v) => v,
        };
        out.sort_by(|a, b| b.score.total_cmp(&a.score));
        out
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn top(self) -> Option<LabelScore> {
        let all = match self {
            ClassificationResponse::Nested(v) => v.into_iter().next().unwrap_or_default(),
            ClassificationResponse::Flat(v) => v,
        };
        all.into_iter().max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[async_trait]
impl Summarizer for HuggingFaceClient {
    async fn summarize_chunk(
        &self,
        chunk: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String> {
        let resp: Vec<SummaryItem> = self
            .post(
                &self.summarization_model,
                json!({
                    "inputs": chunk,
                    "parameters": {
                        "max_length": max_length,
                        "min_length": min_length,
                        "do_sample": false,
                    }
                }),
            )
            .await?;
        resp.into_iter()
            .next()
            .map(|s| s.summary_text)
            .ok_or_else(|| anyhow!("summarization model returned no summary"))
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClient {
    async fn classify_sentiment(&self, text: &str) -> Result<Classification> {
        let input = crate::text::truncate_chars(text, SENTIMENT_INPUT_CHARS);
        let resp: ClassificationResponse = self
            .post(&self.sentiment_model, json!({ "inputs": input }))
            .await?;
        let top = resp
            .top()
            .ok_or_else(|| anyhow!("sentiment model returned no labels"))?;
        Ok(Classification::new(top.label.to_lowercase(), top.score))
    }
}

#[async_trait]
impl BiasClassifier for HuggingFaceClient {
    async fn classify_bias(&self, text: &str) -> Result<Classification> {
        let ranked = self.zero_shot(text, &BIAS_LABELS, false, None).await?;
        let top = ranked
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("zero-shot model returned no labels"))?;
        Ok(Classification::new(top.label, top.score))
    }
}

#[async_trait]
impl EntailmentScorer for HuggingFaceClient {
    async fn entailment(&self, premise: &str, hypothesis: &str) -> Result<f64> {
        // The claim itself is the only candidate label, tested verbatim.
        let ranked = self
            .zero_shot(premise, &[hypothesis], true, Some("{}"))
            .await?;
        ranked
            .first()
            .map(|l| l.score.clamp(0.0, 1.0))
            .ok_or_else(|| anyhow!("zero-shot model returned no entailment score"))
    }
}

#[async_trait]
impl SimilarityScorer for HuggingFaceClient {
    async fn similarities(&self, source: &str, candidates: &[&str]) -> Result<Vec<f64>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let scores: Vec<f64> = self
            .post(
                &self.similarity_model,
                json!({
                    "inputs": {
                        "source_sentence": source,
                        "sentences": candidates,
                    }
                }),
            )
            .await?;
        if scores.len() != candidates.len() {
            bail!(
                "similarity model returned {} scores for {} sentences",
                scores.len(),
                candidates.len()
            );
        }
        Ok(scores)
    }
}
