// src/api.rs
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::pipeline::Pipeline;
use crate::report::EvaluateResponse;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "ok" }))
        .route("/evaluate", post(evaluate))
        .route("/summarize", post(summarize))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub text: String,
    /// Accepted for client compatibility; unused.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SummarizeResponse {
    pub summary: String,
    pub success: bool,
}

#[derive(Debug, Serialize)]
struct RootInfo {
    message: &'static str,
    version: &'static str,
    endpoints: [&'static str; 2],
}

async fn root() -> Json<RootInfo> {
    Json(RootInfo {
        message: "Content Credibility API is running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ["/evaluate", "/summarize"],
    })
}

async fn evaluate(
    State(state): State<AppState>,
    Json(req): Json<ContentRequest>,
) -> Json<EvaluateResponse> {
    Json(state.pipeline.evaluate_or_error(&req.text).await)
}

async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<ContentRequest>,
) -> Json<SummarizeResponse> {
    match state.pipeline.summarize(&req.text).await {
        Ok(s) => Json(SummarizeResponse {
            summary: s.summary,
            success: true,
        }),
        Err(e) => {
            warn!(target: "api", error = %e, "summarize failed");
            Json(SummarizeResponse {
                summary: format!("Error: {e:#}"),
                success: false,
            })
        }
    }
}
