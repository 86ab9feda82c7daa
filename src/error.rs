// src/error.rs
use thiserror::Error;

/// Failures that abort an evaluation. Everything else degrades inside the
/// pipeline (error-labelled module results, empty reference sets).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to extract content from URL: {0}")]
    ContentFetch(String),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
