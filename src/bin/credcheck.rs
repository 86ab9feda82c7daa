//! Console front-end and standalone server.
//!
//! ```text
//! credcheck                      # interactive prompt
//! credcheck "Some claim."        # evaluate one input and exit
//! credcheck --server --port 8000 # serve the HTTP API
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use credibility_analyzer::{
    api::{self, AppState},
    cli,
    config::AppConfig,
    logging::init_tracing,
    metrics::Metrics,
    pipeline::Pipeline,
    report::EvaluateResponse,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "credcheck")]
#[command(version, about = "Content credibility analyzer", long_about = None)]
struct Args {
    /// Serve the HTTP API instead of prompting.
    #[arg(long)]
    server: bool,

    /// Listen port for --server (defaults to server.port from the config).
    #[arg(long)]
    port: Option<u16>,

    /// Config file (defaults to $CREDIBILITY_CONFIG_PATH or config/credibility.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Text or URL to evaluate without prompting.
    input: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => AppConfig::load_with_overrides(path)?,
        None => AppConfig::load()?,
    };
    init_tracing(&cfg.logging);

    let pipeline = Pipeline::from_config(&cfg)?;

    if args.server {
        let port = args.port.unwrap_or(cfg.server.port);
        let mut router = api::create_router(AppState::new(pipeline));
        if cfg.server.metrics {
            router = router.merge(Metrics::init()?.router());
        }
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("binding port {port}"))?;
        info!(target: "server", port, "Content Credibility API listening");
        axum::serve(listener, router).await.context("serving http")?;
        return Ok(());
    }

    let input = match args.input {
        Some(text) => Some(text),
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            cli::print_banner(&mut stdout)?;
            cli::read_request(&mut stdin.lock(), &mut stdout)?
        }
    };
    let Some(input) = input else {
        println!("{}", cli::render_error("no input provided"));
        return Ok(());
    };

    println!("\nAnalyzing content... This may take a few moments.\n");
    let response = pipeline.evaluate_or_error(&input).await;

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &response)?;
        writeln!(stdout)?;
        return Ok(());
    }
    match response {
        EvaluateResponse::Report(report) => {
            write!(stdout, "{}", cli::render_report(&report, chrono::Utc::now()))?
        }
        EvaluateResponse::Error(e) => writeln!(stdout, "{}", cli::render_error(&e.error))?,
    }
    Ok(())
}
