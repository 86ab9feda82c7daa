//! Content Credibility API: binary entrypoint.
//! Boots the Axum HTTP server on Shuttle, wiring the pipeline, routes and
//! middleware.

use anyhow::Context;
use credibility_analyzer::{
    api::{create_router, AppState},
    config::AppConfig,
    logging::init_tracing,
    metrics::Metrics,
    pipeline::Pipeline,
};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    let cfg = AppConfig::load().context("loading credibility config")?;
    init_tracing(&cfg.logging);

    let pipeline = Pipeline::from_config(&cfg).context("building pipeline")?;
    let mut router = create_router(AppState::new(pipeline));
    if cfg.server.metrics {
        router = router.merge(Metrics::init()?.router());
    }

    Ok(router.into())
}
