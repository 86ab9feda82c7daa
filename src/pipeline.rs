// src/pipeline.rs
//! # Evaluation pipeline
//! Input (URL or text) → content → summary + references → four signals →
//! credibility score.
//!
//! Summarization and retrieval run concurrently, then the four signal
//! modules run concurrently; aggregation waits for all of them. Only a
//! failed extraction aborts a request. Module failures and timeouts become
//! error-labelled results worth 0.0, a failed summary leaves the summary
//! empty, and a failed retrieval leaves the reference set empty.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use metrics::{counter, histogram};
use tracing::{info, warn};

use crate::analyze::{
    aggregate, BiasDetector, FactChecker, ModuleScores, SentimentAnalysis, SimilarityChecker,
    Weights,
};
use crate::config::{AppConfig, PipelineConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::extract::{ContentExtractor, HttpExtractor};
use crate::models::{ModelRegistry, Summarizer};
use crate::report::{AnalysisReport, ErrorReport, EvaluateResponse, RelatedArticle};
use crate::retrieve::{news_rss::NewsSearchRetriever, DisabledRetriever, DocumentRetriever};
use crate::signal::{Reference, SignalKind, SignalModule, SignalResult};
use crate::summarize::{Summary, TextSummarizer};
use crate::text::{anon_hash, truncate_chars};

/// What the caller handed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationInput<'a> {
    Url(&'a str),
    Text(&'a str),
}

impl<'a> EvaluationInput<'a> {
    /// A URL iff the trimmed input starts with `http://` or `https://`.
    pub fn detect(input: &'a str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            EvaluationInput::Url(trimmed)
        } else {
            EvaluationInput::Text(input)
        }
    }
}

/// Collaborators of a [`Pipeline`]. Every field is a trait object so tests
/// can swap any of them.
#[derive(Clone)]
pub struct Components {
    pub extractor: Arc<dyn ContentExtractor>,
    pub retriever: Arc<dyn DocumentRetriever>,
    pub summarizer: Arc<dyn Summarizer>,
    pub fact_checker: Arc<dyn SignalModule>,
    pub similarity: Arc<dyn SignalModule>,
    pub sentiment: Arc<dyn SignalModule>,
    pub bias: Arc<dyn SignalModule>,
}

impl Components {
    /// Signal modules wired to `models`; extraction and retrieval supplied by
    /// the caller.
    pub fn from_registry(
        models: &ModelRegistry,
        cfg: &AppConfig,
        extractor: Arc<dyn ContentExtractor>,
        retriever: Arc<dyn DocumentRetriever>,
    ) -> Self {
        Self {
            extractor,
            retriever,
            summarizer: models.summarizer.clone(),
            fact_checker: Arc::new(FactChecker::new(
                models.entailment.clone(),
                cfg.fact_check.clone(),
            )),
            similarity: Arc::new(SimilarityChecker::new(
                models.similarity.clone(),
                cfg.similarity.clone(),
            )),
            sentiment: Arc::new(SentimentAnalysis::new(models.sentiment.clone())),
            bias: Arc::new(BiasDetector::new(models.bias.clone())),
        }
    }
}

pub struct Pipeline {
    extractor: Arc<dyn ContentExtractor>,
    retriever: Arc<dyn DocumentRetriever>,
    summarizer: TextSummarizer,
    fact_checker: Arc<dyn SignalModule>,
    similarity: Arc<dyn SignalModule>,
    sentiment: Arc<dyn SignalModule>,
    bias: Arc<dyn SignalModule>,
    weights: Weights,
    cfg: PipelineConfig,
}

impl Pipeline {
    pub fn new(parts: Components, cfg: &AppConfig) -> Self {
        Self {
            extractor: parts.extractor,
            retriever: parts.retriever,
            summarizer: TextSummarizer::new(parts.summarizer, cfg.summarizer.clone()),
            fact_checker: parts.fact_checker,
            similarity: parts.similarity,
            sentiment: parts.sentiment,
            bias: parts.bias,
            weights: cfg.weights,
            cfg: cfg.pipeline.clone(),
        }
    }

    /// Production wiring: configured model backend, HTTP extractor and news
    /// search retriever (unless retrieval is disabled).
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let models = ModelRegistry::from_config(&cfg.models)?;
        let extractor: Arc<dyn ContentExtractor> = Arc::new(HttpExtractor::new(&cfg.extractor)?);
        let retriever: Arc<dyn DocumentRetriever> = if cfg.retriever.enabled {
            Arc::new(NewsSearchRetriever::new(
                cfg.retriever.clone(),
                extractor.clone(),
            )?)
        } else {
            Arc::new(DisabledRetriever)
        };
        info!(
            target: "pipeline",
            provider = models.provider,
            retriever = retriever.name(),
            "pipeline ready"
        );
        Ok(Self::new(
            Components::from_registry(&models, cfg, extractor, retriever),
            cfg,
        ))
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Summarize text on its own (the `/summarize` operation).
    pub async fn summarize(&self, text: &str) -> Result<Summary> {
        self.summarizer.summarize(text).await
    }

    /// Like [`Pipeline::evaluate`], with fatal errors folded into an
    /// [`ErrorReport`].
    pub async fn evaluate_or_error(&self, input: &str) -> EvaluateResponse {
        match self.evaluate(input).await {
            Ok(report) => EvaluateResponse::Report(Box::new(report)),
            Err(e) => EvaluateResponse::Error(ErrorReport::new(e.to_string())),
        }
    }

    pub async fn evaluate(&self, input: &str) -> PipelineResult<AnalysisReport> {
        let t0 = Instant::now();
        let out = self.run(input).await;
        let outcome = if out.is_ok() { "ok" } else { "error" };
        counter!("credibility_evaluations_total", "outcome" => outcome).increment(1);
        histogram!("credibility_pipeline_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        if let Err(e) = &out {
            warn!(target: "pipeline", error = %e, "evaluation aborted");
        }
        out
    }

    async fn run(&self, input: &str) -> PipelineResult<AnalysisReport> {
        let (title, body) = match EvaluationInput::detect(input) {
            EvaluationInput::Url(url) => {
                let page = self
                    .extractor
                    .extract(url)
                    .await
                    .map_err(|e| PipelineError::ContentFetch(format!("{e:#}")))?;
                let title = if page.title.is_empty() {
                    url.to_string()
                } else {
                    page.title
                };
                (title, page.text)
            }
            EvaluationInput::Text(text) => (self.cfg.placeholder_title.clone(), text.to_string()),
        };

        let doc = anon_hash(&body);
        info!(
            target: "pipeline",
            doc = %doc,
            chars = body.chars().count(),
            "evaluation started"
        );

        let query = truncate_chars(&body, self.cfg.query_chars);
        let (summary, references) =
            tokio::join!(self.summarizer.summarize(&body), self.references(query));
        let summary = match summary {
            Ok(s) => s.summary,
            Err(e) => {
                let err = format!("{e:#}");
                warn!(
                    target: "pipeline",
                    doc = %doc,
                    error = %err,
                    "summarization failed, continuing without summary"
                );
                counter!("credibility_module_errors_total", "module" => "summarizer").increment(1);
                String::new()
            }
        };

        let (fact_check, similarity, sentiment, bias) = tokio::join!(
            self.signal(SignalKind::FactChecker, self.fact_checker.as_ref(), &body, &references),
            self.signal(SignalKind::SimilarityChecker, self.similarity.as_ref(), &body, &references),
            self.signal(SignalKind::SentimentAnalysis, self.sentiment.as_ref(), &body, &references),
            self.signal(SignalKind::BiasDetector, self.bias.as_ref(), &body, &references),
        );

        let scores = ModuleScores {
            fact_checker: fact_check.score,
            similarity_checker: similarity.score,
            bias_detector: bias.score,
            sentiment_analysis: sentiment.score,
        };
        let credibility = aggregate(&scores, &self.weights);

        info!(
            target: "pipeline",
            doc = %doc,
            references = references.len(),
            final_score = credibility.final_score,
            "evaluation finished"
        );

        Ok(AnalysisReport {
            title,
            summary,
            credibility,
            fact_check,
            similarity,
            sentiment,
            bias,
            related_articles: RelatedArticle::from_references(&references),
        })
    }

    /// Best-effort retrieval capped at `max_references`.
    async fn references(&self, query: &str) -> Vec<Reference> {
        let max = self.cfg.max_references;
        match self.retriever.retrieve(query, max).await {
            Ok(mut refs) => {
                refs.truncate(max);
                refs
            }
            Err(e) => {
                let err = format!("{e:#}");
                warn!(
                    target: "pipeline",
                    retriever = self.retriever.name(),
                    error = %err,
                    "retrieval failed, continuing without references"
                );
                counter!("credibility_module_errors_total", "module" => "retriever").increment(1);
                Vec::new()
            }
        }
    }

    /// Run one module in isolation: errors, timeouts and non-finite scores
    /// become error results.
    async fn signal(
        &self,
        kind: SignalKind,
        module: &dyn SignalModule,
        text: &str,
        references: &[Reference],
    ) -> SignalResult {
        let limit = Duration::from_secs(self.cfg.module_timeout_secs);
        let reason = match tokio::time::timeout(limit, module.analyze(text, references)).await {
            Ok(Ok(result)) if result.score.is_finite() => return result,
            Ok(Ok(result)) => format!("{} produced a non-finite score", module.name()),
            Ok(Err(e)) => format!("{e:#}"),
            Err(_) => format!("{} timed out after {}s", kind.display_name(), limit.as_secs()),
        };
        warn!(target: "pipeline", module = %kind, error = %reason, "signal module failed");
        counter!("credibility_module_errors_total", "module" => kind.as_str()).increment(1);
        SignalResult::error(reason)
    }
}
