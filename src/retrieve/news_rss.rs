// src/retrieve/news_rss.rs
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};
use tracing::{debug, info, warn};

use super::DocumentRetriever;
use crate::config::RetrieverConfig;
use crate::extract::ContentExtractor;
use crate::signal::Reference;
use crate::text::normalize_text;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// One search hit from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedHit {
    pub title: String,
    pub url: String,
    /// Unix seconds, 0 when missing or unparsable.
    pub published_at: u64,
}

fn parse_rfc2822_to_unix(ts: &str) -> u64 {
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|x| u64::try_from(x).ok())
        .unwrap_or(0)
}

/// Parse an RSS search feed into hits that carry a link.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedHit>> {
    let rss: Rss = from_str(xml).context("parsing news search rss")?;
    Ok(rss
        .channel
        .item
        .into_iter()
        .filter_map(|it| {
            let url = it.link?.trim().to_string();
            if url.is_empty() {
                return None;
            }
            Some(FeedHit {
                title: normalize_text(it.title.as_deref().unwrap_or_default()),
                published_at: it.pub_date.as_deref().map(parse_rfc2822_to_unix).unwrap_or(0),
                url,
            })
        })
        .collect())
}

/// Searches a news RSS endpoint and downloads the hits as reference texts.
pub struct NewsSearchRetriever {
    http: reqwest::Client,
    extractor: Arc<dyn ContentExtractor>,
    cfg: RetrieverConfig,
}

impl NewsSearchRetriever {
    pub fn new(cfg: RetrieverConfig, extractor: Arc<dyn ContentExtractor>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(Duration::from_secs(cfg.search_timeout_secs))
            .build()
            .context("building search http client")?;
        Ok(Self {
            http,
            extractor,
            cfg,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<FeedHit>> {
        let resp = self
            .http
            .get(&self.cfg.search_url)
            .query(&[("q", query)])
            .send()
            .await
            .context("news search request")?
            .error_for_status()
            .context("news search status")?;
        let xml = resp.text().await.context("reading news search feed")?;
        parse_feed(&xml)
    }

    /// Download hits in feed order until `max_results` usable bodies are found.
    async fn collect(&self, hits: Vec<FeedHit>, max_results: usize) -> Vec<Reference> {
        let per_article = Duration::from_secs(self.cfg.fetch_timeout_secs);
        let mut out = Vec::with_capacity(max_results);
        for hit in hits {
            if out.len() >= max_results {
                break;
            }
            match tokio::time::timeout(per_article, self.extractor.extract(&hit.url)).await {
                Ok(Ok(page)) if page.text.chars().count() > self.cfg.min_article_chars => {
                    debug!(
                        target: "retrieve",
                        url = %hit.url,
                        published_at = hit.published_at,
                        "reference added"
                    );
                    let title = if page.title.is_empty() { hit.title } else { page.title };
                    out.push(Reference {
                        title: Some(title),
                        url: Some(hit.url),
                        text: page.text,
                    });
                }
                Ok(Ok(_)) => debug!(target: "retrieve", url = %hit.url, "skipped: too short"),
                Ok(Err(e)) => warn!(target: "retrieve", url = %hit.url, error = %e, "skipped url"),
                Err(_) => warn!(target: "retrieve", url = %hit.url, "skipped url: timed out"),
            }
        }
        out
    }
}

#[async_trait]
impl DocumentRetriever for NewsSearchRetriever {
    async fn retrieve(&self, query: &str, max_results: usize) -> Result<Vec<Reference>> {
        if max_results == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let t0 = std::time::Instant::now();

        let mut hits = self.search(query).await?;
        hits.truncate(max_results.saturating_mul(self.cfg.candidate_factor.max(1)));
        let candidates = hits.len();

        let refs = self.collect(hits, max_results).await;

        histogram!("credibility_retrieval_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("credibility_references_retrieved").increment(refs.len() as u64);
        info!(
            target: "retrieve",
            candidates,
            kept = refs.len(),
            "news search finished"
        );
        Ok(refs)
    }

    fn name(&self) -> &'static str {
        "news_rss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractedContent;
    use crate::test_support::serve;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;
    use std::sync::Mutex;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>search</title>
<item><title>Earth &amp; Sun explained</title><link>https://example.org/a</link>
<pubDate>Tue, 03 Jun 2025 10:00:00 +0000</pubDate></item>
<item><title>No link here</title></item>
<item><title>Short page</title><link>https://example.org/short</link></item>
<item><title>Broken page</title><link>https://example.org/broken</link></item>
<item><title>Second long</title><link>https://example.org/b</link></item>
</channel></rss>"#;

    struct FakeExtractor;

    #[async_trait]
    impl ContentExtractor for FakeExtractor {
        async fn extract(&self, url: &str) -> Result<ExtractedContent> {
            match url {
                "https://example.org/short" => Ok(ExtractedContent {
                    title: "Short".into(),
                    text: "too short".into(),
                }),
                "https://example.org/broken" => anyhow::bail!("404"),
                _ => Ok(ExtractedContent {
                    title: String::new(),
                    text: "word ".repeat(100),
                }),
            }
        }
    }

    fn retriever() -> NewsSearchRetriever {
        NewsSearchRetriever::new(RetrieverConfig::default(), Arc::new(FakeExtractor)).unwrap()
    }

    /// Every page is too short to keep; remembers which URLs were fetched.
    #[derive(Default)]
    struct Recording(Mutex<Vec<String>>);

    #[async_trait]
    impl ContentExtractor for Recording {
        async fn extract(&self, url: &str) -> Result<ExtractedContent> {
            self.0.lock().unwrap().push(url.to_string());
            Ok(ExtractedContent {
                title: String::new(),
                text: "stub".into(),
            })
        }
    }

    /// Search endpoint serving [`FEED`] and recording the `q` parameter.
    async fn search_server(queries: Arc<Mutex<Vec<String>>>) -> String {
        let router = Router::new().route(
            "/rss",
            get(move |Query(q): Query<HashMap<String, String>>| {
                let queries = queries.clone();
                async move {
                    queries
                        .lock()
                        .unwrap()
                        .push(q.get("q").cloned().unwrap_or_default());
                    FEED
                }
            }),
        );
        serve(router).await
    }

    #[test]
    fn parses_items_with_links() {
        let hits = parse_feed(FEED).unwrap();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].title, "Earth & Sun explained");
        assert_eq!(hits[0].url, "https://example.org/a");
        assert_eq!(hits[0].published_at, 1_748_944_800);
        assert_eq!(hits[1].published_at, 0);
    }

    #[test]
    fn empty_channel_parses() {
        let hits = parse_feed("<rss><channel><title>x</title></channel></rss>").unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn collect_skips_short_and_failing_pages() {
        let r = retriever();
        let hits = parse_feed(FEED).unwrap();
        let refs = r.collect(hits, 5).await;
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].url.as_deref(), Some("https://example.org/a"));
        // page had no title, feed title is used
        assert_eq!(refs[0].title.as_deref(), Some("Earth & Sun explained"));
    }

    #[tokio::test]
    async fn collect_stops_at_max() {
        let r = retriever();
        let refs = r.collect(parse_feed(FEED).unwrap(), 1).await;
        assert_eq!(refs.len(), 1);
    }

    #[tokio::test]
    async fn search_candidates_are_capped_by_factor() {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let base = search_server(queries.clone()).await;
        let pages = Arc::new(Recording::default());
        let cfg = RetrieverConfig {
            search_url: format!("{base}/rss"),
            candidate_factor: 2,
            ..RetrieverConfig::default()
        };
        let r = NewsSearchRetriever::new(cfg, pages.clone()).unwrap();

        let refs = r.retrieve("earth sun orbit", 1).await.unwrap();
        assert!(refs.is_empty());
        assert_eq!(*queries.lock().unwrap(), vec!["earth sun orbit".to_string()]);
        // four linked hits in the feed, only 1 * 2 are fetched
        assert_eq!(
            *pages.0.lock().unwrap(),
            vec!["https://example.org/a", "https://example.org/short"]
        );
    }

    #[tokio::test]
    async fn failed_search_is_an_error() {
        let router = Router::new().route(
            "/rss",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
        );
        let base = serve(router).await;
        let cfg = RetrieverConfig {
            search_url: format!("{base}/rss"),
            ..RetrieverConfig::default()
        };
        let err = NewsSearchRetriever::new(cfg, Arc::new(FakeExtractor))
            .unwrap()
            .retrieve("earth", 3)
            .await
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("news search status"), "{msg}");
        assert!(msg.contains("503"), "{msg}");
    }
}
