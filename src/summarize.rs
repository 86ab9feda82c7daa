// src/summarize.rs
//! Chunked summarization.
//!
//! Long inputs are cut into overlapping character windows, each window is
//! summarized by the configured backend, and the pieces are joined with a
//! single space.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::SummarizerConfig;
use crate::models::Summarizer;
use crate::text::word_count;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub summary: String,
    /// Words in `summary`.
    pub length: usize,
    pub reason: String,
}

#[derive(Clone)]
pub struct TextSummarizer {
    model: Arc<dyn Summarizer>,
    cfg: SummarizerConfig,
}

impl TextSummarizer {
    pub fn new(model: Arc<dyn Summarizer>, cfg: SummarizerConfig) -> Self {
        Self { model, cfg }
    }

    pub async fn summarize(&self, text: &str) -> Result<Summary> {
        let chunks = chunk_text(text, self.cfg.chunk_size, self.cfg.overlap);
        let mut parts = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let piece = self
                .model
                .summarize_chunk(chunk, self.cfg.max_length, self.cfg.min_length)
                .await
                .with_context(|| format!("summarizing chunk {} of {}", i + 1, chunks.len()))?;
            parts.push(piece.trim().to_string());
        }

        let summary = parts.join(" ");
        let words = word_count(&summary);
        Ok(Summary {
            reason: format!(
                "Summarized in {} chunks. Final summary has {} words.",
                chunks.len(),
                words
            ),
            length: words,
            summary,
        })
    }
}

/// Overlapping windows of `chunk_size` characters advancing by
/// `chunk_size - overlap`. The last window may be shorter.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let step = chunk_size.saturating_sub(overlap).max(1);

    // Byte offset of every char boundary, plus the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = bounds.len() - 1;

    let mut out = Vec::new();
    let mut start = 0usize;
    while start < total {
        let end = (start + chunk_size).min(total);
        out.push(&text[bounds[start]..bounds[end]]);
        start += step;
    }
    out
}
