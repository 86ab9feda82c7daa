// src/lib.rs
// Public library surface shared by the binaries and integration tests.

pub mod analyze;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod retrieve;
pub mod signal;
pub mod summarize;
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::error::PipelineError;
pub use crate::pipeline::{Components, Pipeline};
pub use crate::report::{AnalysisReport, ErrorReport, EvaluateResponse};
pub use crate::signal::{Reference, SignalKind, SignalModule, SignalResult};
