// src/config/mod.rs
//! Runtime configuration.
//!
//! Resolution order for the file: `$CREDIBILITY_CONFIG_PATH` (must exist),
//! then `config/credibility.toml`, then built-in defaults. A handful of env
//! vars override single keys afterwards (see the `ENV_*` constants).
//! Every table is optional; missing keys take their defaults.

use std::{env, fs, path::Path, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analyze::Weights;

pub const DEFAULT_CONFIG_PATH: &str = "config/credibility.toml";

pub const ENV_CONFIG_PATH: &str = "CREDIBILITY_CONFIG_PATH";
pub const ENV_MODEL_PROVIDER: &str = "CREDIBILITY_MODEL_PROVIDER";
pub const ENV_LOG_FORMAT: &str = "CREDIBILITY_LOG_FORMAT";
pub const ENV_RETRIEVAL: &str = "CREDIBILITY_RETRIEVAL";
pub const ENV_METRICS: &str = "METRICS_ENABLED";
pub const ENV_HF_TOKEN: &str = "HF_API_TOKEN";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; credibility-analyzer/0.1)";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub weights: Weights,
    pub pipeline: PipelineConfig,
    pub summarizer: SummarizerConfig,
    pub extractor: ExtractorConfig,
    pub retriever: RetrieverConfig,
    pub models: ModelsConfig,
    pub fact_check: FactCheckConfig,
    pub similarity: SimilarityConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Title used when the input is text rather than a URL.
    pub placeholder_title: String,
    /// Leading characters of the body used as the search query.
    pub query_chars: usize,
    pub max_references: usize,
    /// Upper bound for a single signal module call.
    pub module_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            placeholder_title: "User provided content".to_string(),
            query_chars: 200,
            max_references: 5,
            module_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    pub max_length: usize,
    pub min_length: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 100,
            max_length: 200,
            min_length: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_secs: 4,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    pub enabled: bool,
    /// RSS search endpoint; the query goes into `?q=`.
    pub search_url: String,
    /// Feed hits considered per wanted document.
    pub candidate_factor: usize,
    /// Pages with this many characters or fewer are skipped.
    pub min_article_chars: usize,
    pub fetch_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            search_url: "https://news.google.com/rss/search".to_string(),
            candidate_factor: 2,
            min_article_chars: 300,
            fetch_timeout_secs: 5,
            search_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    HuggingFace,
    Local,
}

impl FromStr for ModelProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(ModelProvider::HuggingFace),
            "local" => Ok(ModelProvider::Local),
            other => bail!("unsupported model provider: {other}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub provider: ModelProvider,
    pub api_base: String,
    /// "ENV" means: read from `HF_API_TOKEN`.
    pub api_key: String,
    pub summarization_model: String,
    pub sentiment_model: String,
    pub zero_shot_model: String,
    pub similarity_model: String,
    pub request_timeout_secs: u64,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::HuggingFace,
            api_base: "https://router.huggingface.co/hf-inference/models".to_string(),
            api_key: "ENV".to_string(),
            summarization_model: "facebook/bart-large-cnn".to_string(),
            sentiment_model: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
            zero_shot_model: "facebook/bart-large-mnli".to_string(),
            similarity_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ModelsConfig {
    pub fn resolved_api_key(&self) -> Result<String> {
        let key = if self.api_key.trim().eq_ignore_ascii_case("env") {
            env::var(ENV_HF_TOKEN).map_err(|_| {
                anyhow!("Missing {ENV_HF_TOKEN} env var (or set models.provider = \"local\")")
            })?
        } else {
            self.api_key.clone()
        };
        let key = key.trim().to_string();
        if key.is_empty() {
            bail!("inference api key is empty (or set models.provider = \"local\")");
        }
        Ok(key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactCheckConfig {
    /// Leading characters of the body treated as the claim.
    pub claim_chars: usize,
    /// Leading characters of each reference used as evidence.
    pub premise_chars: usize,
    pub supported_threshold: f64,
    pub partial_threshold: f64,
    /// Score reported when there is nothing to check against.
    pub insufficient_score: f64,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            claim_chars: 300,
            premise_chars: 1000,
            supported_threshold: 0.7,
            partial_threshold: 0.4,
            insufficient_score: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Leading characters of the body and of each reference compared.
    pub reference_chars: usize,
    pub high_threshold: f64,
    pub partial_threshold: f64,
    pub insufficient_score: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            reference_chars: 2000,
            high_threshold: 0.75,
            partial_threshold: 0.45,
            insufficient_score: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "pretty" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => bail!("unsupported log format: {other}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port of the standalone server (`credcheck --server`).
    pub port: u16,
    /// Expose `/metrics`.
    pub metrics: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            metrics: false,
        }
    }
}

impl AppConfig {
    /// Parse and validate one TOML file. No env overrides are applied.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()
    }

    /// Resolve the config file (env path, default path, built-ins) and
    /// apply env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                if !Path::new(&p).exists() {
                    bail!("{ENV_CONFIG_PATH} points to non-existent path: {p}");
                }
                Self::load_from_file(&p)?
            }
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => {
                info!(target: "config", "no config file found, using built-in defaults");
                Self::default()
            }
        };
        cfg.apply_env_overrides()?;
        cfg.validate()
    }

    /// Load an explicitly chosen file and apply env overrides.
    pub fn load_with_overrides<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut cfg = Self::load_from_file(path)?;
        cfg.apply_env_overrides()?;
        cfg.validate()
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = env::var(ENV_MODEL_PROVIDER) {
            self.models.provider = v.parse()?;
        }
        if let Ok(v) = env::var(ENV_LOG_FORMAT) {
            self.logging.format = v.parse()?;
        }
        if let Ok(v) = env::var(ENV_RETRIEVAL) {
            self.retriever.enabled = env_flag(&v);
        }
        if let Ok(v) = env::var(ENV_METRICS) {
            self.server.metrics = env_flag(&v);
        }
        Ok(())
    }

    pub fn validate(self) -> Result<Self> {
        self.weights.validate()?;

        let s = &self.summarizer;
        if s.chunk_size == 0 || s.overlap >= s.chunk_size {
            bail!(
                "summarizer.overlap ({}) must be smaller than a non-zero chunk_size ({})",
                s.overlap,
                s.chunk_size
            );
        }
        if s.min_length > s.max_length {
            bail!("summarizer.min_length must not exceed max_length");
        }

        let f = &self.fact_check;
        check_unit("fact_check.supported_threshold", f.supported_threshold)?;
        check_unit("fact_check.partial_threshold", f.partial_threshold)?;
        check_unit("fact_check.insufficient_score", f.insufficient_score)?;
        if f.partial_threshold > f.supported_threshold {
            bail!("fact_check.partial_threshold must not exceed supported_threshold");
        }

        let m = &self.similarity;
        check_unit("similarity.high_threshold", m.high_threshold)?;
        check_unit("similarity.partial_threshold", m.partial_threshold)?;
        check_unit("similarity.insufficient_score", m.insufficient_score)?;
        if m.partial_threshold > m.high_threshold {
            bail!("similarity.partial_threshold must not exceed high_threshold");
        }

        if self.pipeline.module_timeout_secs == 0 {
            bail!("pipeline.module_timeout_secs must be positive");
        }
        Ok(self)
    }
}

fn check_unit(name: &str, v: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&v) {
        bail!("{name} must be within [0,1], got {v}");
    }
    Ok(())
}

fn env_flag(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
