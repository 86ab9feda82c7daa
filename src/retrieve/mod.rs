// src/retrieve/mod.rs
//! Reference document retrieval for cross-checking.
//!
//! Best effort by contract: a retriever may return fewer documents than
//! asked for, or none, in any order.

pub mod news_rss;

use anyhow::Result;
use async_trait::async_trait;

use crate::signal::Reference;

#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    async fn retrieve(&self, query: &str, max_results: usize) -> Result<Vec<Reference>>;
    fn name(&self) -> &'static str;
}

/// Always returns no documents; used when retrieval is switched off.
pub struct DisabledRetriever;

#[async_trait]
impl DocumentRetriever for DisabledRetriever {
    async fn retrieve(&self, _query: &str, _max_results: usize) -> Result<Vec<Reference>> {
        Ok(Vec::new())
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}
