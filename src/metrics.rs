// src/metrics.rs
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

impl Metrics {
    /// Install the Prometheus recorder (once per process) and describe the
    /// series so they show up on `/metrics` before the first evaluation.
    pub fn init() -> Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| {
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .context("prometheus: install recorder")?;
                describe();
                Ok::<_, anyhow::Error>(handle)
            })?
            .clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!(
        "credibility_evaluations_total",
        "Evaluations finished, labelled by outcome."
    );
    describe_counter!(
        "credibility_module_errors_total",
        "Signal module failures, labelled by module."
    );
    describe_counter!(
        "credibility_references_retrieved",
        "Reference documents kept by the retriever."
    );
    describe_histogram!("credibility_pipeline_ms", "End-to-end evaluation time in milliseconds.");
    describe_histogram!("credibility_retrieval_ms", "News search and download time in milliseconds.");
}
