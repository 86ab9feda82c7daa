// tests/common/mod.rs
//
// Hand-rolled fakes for every pipeline collaborator.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use credibility_analyzer::config::AppConfig;
use credibility_analyzer::extract::{ContentExtractor, ExtractedContent};
use credibility_analyzer::models::Summarizer;
use credibility_analyzer::retrieve::DocumentRetriever;
use credibility_analyzer::{Components, Pipeline, Reference, SignalModule, SignalResult};

pub struct FixedSignal(pub SignalResult);

#[async_trait]
impl SignalModule for FixedSignal {
    async fn analyze(&self, _text: &str, _refs: &[Reference]) -> Result<SignalResult> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &'static str {
        "fixed"
    }
}

pub struct FailingSignal(pub &'static str);

#[async_trait]
impl SignalModule for FailingSignal {
    async fn analyze(&self, _text: &str, _refs: &[Reference]) -> Result<SignalResult> {
        bail!("{}", self.0)
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

pub struct SlowSignal(pub Duration);

#[async_trait]
impl SignalModule for SlowSignal {
    async fn analyze(&self, _text: &str, _refs: &[Reference]) -> Result<SignalResult> {
        tokio::time::sleep(self.0).await;
        Ok(SignalResult::new("late", 1.0, "finished too late"))
    }
    fn name(&self) -> &'static str {
        "slow"
    }
}

pub struct FakeExtractor {
    pub page: Option<ExtractedContent>,
}

#[async_trait]
impl ContentExtractor for FakeExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent> {
        match &self.page {
            Some(p) => Ok(p.clone()),
            None => bail!("connection refused for {url}"),
        }
    }
}

/// Returns a fixed set of references and records the queries it saw.
pub struct FakeRetriever {
    pub refs: Vec<Reference>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeRetriever {
    pub fn new(refs: Vec<Reference>) -> Arc<Self> {
        Arc::new(Self {
            refs,
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DocumentRetriever for FakeRetriever {
    async fn retrieve(&self, query: &str, _max: usize) -> Result<Vec<Reference>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.refs.clone())
    }
    fn name(&self) -> &'static str {
        "fake"
    }
}

pub struct FailingRetriever;

#[async_trait]
impl DocumentRetriever for FailingRetriever {
    async fn retrieve(&self, _query: &str, _max: usize) -> Result<Vec<Reference>> {
        bail!("search endpoint unreachable")
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Summary = first five words of the chunk.
pub struct FirstWords;

#[async_trait]
impl Summarizer for FirstWords {
    async fn summarize_chunk(&self, chunk: &str, _max: usize, _min: usize) -> Result<String> {
        Ok(chunk.split_whitespace().take(5).collect::<Vec<_>>().join(" "))
    }
}

pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize_chunk(&self, _chunk: &str, _max: usize, _min: usize) -> Result<String> {
        bail!("summarization model is loading")
    }
}

pub fn reference(i: usize) -> Reference {
    Reference {
        title: Some(format!("Related story {i}")),
        url: Some(format!("https://news.example.org/{i}")),
        text: "The Earth revolves around the Sun once a year.".repeat(10),
    }
}

/// Fixed module results that aggregate to 0.8175 with the default weights.
pub fn happy_components() -> Components {
    Components {
        extractor: Arc::new(FakeExtractor {
            page: Some(ExtractedContent {
                title: "Earth and Sun".into(),
                text: "The Earth revolves around the Sun.".into(),
            }),
        }),
        retriever: FakeRetriever::new(vec![reference(1), reference(2)]),
        summarizer: Arc::new(FirstWords),
        fact_checker: Arc::new(FixedSignal(SignalResult::new("supported", 0.9, "backed"))),
        similarity: Arc::new(FixedSignal(SignalResult::new("highly_similar", 0.8, "close"))),
        sentiment: Arc::new(FixedSignal(SignalResult::new("neutral", 0.5, "flat"))),
        bias: Arc::new(FixedSignal(SignalResult::new("neutral", 0.95, "calm"))),
    }
}

pub fn pipeline(parts: Components) -> Pipeline {
    Pipeline::new(parts, &AppConfig::default())
}
