// src/extract.rs
//! Article extraction: URL in, `(title, text)` out.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::text::normalize_text;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedContent {
    pub title: String,
    pub text: String,
}

#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractedContent>;
}

/// Fetches a page over HTTP and pulls the readable text out of its HTML.
pub struct HttpExtractor {
    http: reqwest::Client,
}

impl HttpExtractor {
    pub fn new(cfg: &ExtractorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building extractor http client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ContentExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetching {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("fetching {url} returned {status}");
        }
        let html = resp
            .text()
            .await
            .with_context(|| format!("reading body of {url}"))?;
        let content = parse_article_html(&html);
        debug!(target: "extract", url, chars = content.text.chars().count(), "page extracted");
        if content.text.is_empty() {
            bail!("no article text found at {url}");
        }
        Ok(content)
    }
}

static RE_OG_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]+property\s*=\s*["']og:title["'][^>]*content\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
    )
    .expect("og:title regex")
});
static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex"));
static RE_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|nav|header|footer|aside|form)\b[^>]*>.*?</(script|style|noscript|nav|header|footer|aside|form)>")
        .expect("noise regex")
});
static RE_PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("paragraph regex"));
static RE_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*)</body>").expect("body regex"));

/// Title from `og:title` (else `<title>`); text from `<p>` blocks (else the
/// whole visible body). Scripts, styles and page chrome are dropped first.
pub fn parse_article_html(html: &str) -> ExtractedContent {
    // og:title content may be double- or single-quoted.
    let title = RE_OG_TITLE
        .captures(html)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .or_else(|| RE_TITLE.captures(html).and_then(|c| c.get(1)))
        .map(|m| normalize_text(m.as_str()))
        .unwrap_or_default();

    let cleaned = RE_NOISE.replace_all(html, " ");

    let paragraphs: Vec<String> = RE_PARAGRAPH
        .captures_iter(&cleaned)
        .filter_map(|c| c.get(1))
        .map(|m| normalize_text(m.as_str()))
        .filter(|p| !p.is_empty())
        .collect();

    let text = if paragraphs.is_empty() {
        let body = RE_BODY
            .captures(&cleaned)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or(&cleaned);
        normalize_text(body)
    } else {
        paragraphs.join("\n\n")
    };

    ExtractedContent { title, text }
}
