// src/models/lexicon.rs
//! Offline heuristics that stand in for hosted models.
//!
//! Deterministic and dependency-free at runtime, which makes them the
//! backend of choice for local runs and tests. Scores are coarse; the
//! pipeline only needs them to have the same shape as model outputs.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;

use super::{
    BiasClassifier, Classification, EntailmentScorer, SentimentClassifier, SimilarityScorer,
    Summarizer,
};
use crate::text::{split_sentences, tokenize, word_count};

static SENTIMENT_LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../data/sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

static BIAS_CUES: Lazy<HashSet<String>> = Lazy::new(|| {
    let raw = include_str!("../../data/bias_lexicon.json");
    serde_json::from_str::<HashSet<String>>(raw).expect("valid bias lexicon")
});

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "was", "were", "are", "is", "has", "have",
    "had", "not", "but", "from", "they", "their", "them", "its", "it's", "his", "her", "she",
    "him", "you", "your", "our", "who", "what", "when", "where", "which", "will", "would",
    "can", "could", "been", "being", "than", "then", "there", "these", "those", "into",
    "about", "also", "all", "any", "more", "most", "said", "says", "one", "out", "over",
    "such", "only", "other", "some", "very", "just", "did", "does", "how", "why", "because",
];

/// Max distinct content tokens compared per text.
const TOKEN_CAP: usize = 400;
/// Jaro-Winkler similarity at which two tokens count as the same word.
const FUZZY_MATCH: f64 = 0.92;
/// Word budget of one extractive chunk summary.
const LEAD_WORDS: usize = 60;

#[derive(Debug, Clone, Default)]
pub struct LexiconModels;

impl LexiconModels {
    pub fn new() -> Self {
        Self
    }

    /// Lexicon score and token count. A negator within the previous three
    /// tokens flips the sign of a scored word.
    pub fn sentiment_score(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;
        for (i, w) in tokens.iter().enumerate() {
            let base = *SENTIMENT_LEXICON.get(w.as_str()).unwrap_or(&0);
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }
        (score, tokens.len())
    }

    /// Probability that the text is slanted: density of loaded words,
    /// exclamation marks and shouted (all-caps) words.
    pub fn bias_probability(&self, text: &str) -> f64 {
        let tokens: Vec<String> = tokenize(text).collect();
        let cue_hits = tokens.iter().filter(|t| BIAS_CUES.contains(t.as_str())).count();
        let exclamations = text.matches('!').count();
        let shouted = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphabetic()))
            .filter(|w| w.chars().count() >= 4 && w.chars().all(|c| c.is_uppercase()))
            .count();
        let hits = (cue_hits + exclamations + shouted) as f64;
        let density = hits / tokens.len().max(1) as f64;
        (0.15 + 4.0 * density).min(0.97)
    }
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not" | "no" | "never" | "isn't" | "wasn't" | "aren't" | "won't" | "can't" | "cannot"
            | "without" | "don't" | "doesn't" | "didn't"
    )
}

fn is_stopword(tok: &str) -> bool {
    STOPWORDS.contains(&tok)
}

/// Distinct content tokens in first-seen order, capped.
fn content_tokens(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .filter(|t| t.chars().count() > 2 && !is_stopword(t))
        .filter(|t| seen.insert(t.clone()))
        .take(TOKEN_CAP)
        .collect()
}

/// Dice coefficient over token sets where near-identical words also match.
fn fuzzy_dice(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let exact: HashSet<&str> = b.iter().map(String::as_str).collect();
    let matched = a
        .iter()
        .filter(|t| {
            exact.contains(t.as_str()) || b.iter().any(|u| strsim::jaro_winkler(t, u) >= FUZZY_MATCH)
        })
        .count();
    (2.0 * matched as f64 / (a.len() + b.len()) as f64).min(1.0)
}

/// Pick the sentences with the highest average content-word frequency,
/// returned in their original order, within `budget` words.
fn extractive_summary(chunk: &str, budget: usize) -> String {
    let sentences = split_sentences(chunk);
    if sentences.is_empty() {
        return String::new();
    }

    let mut freq: HashMap<String, usize> = HashMap::new();
    for t in tokenize(chunk).filter(|t| t.chars().count() > 2 && !is_stopword(t)) {
        *freq.entry(t).or_insert(0) += 1;
    }

    let mut ranked: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let toks: Vec<String> = tokenize(s).collect();
            let total: usize = toks.iter().map(|t| freq.get(t).copied().unwrap_or(0)).sum();
            (i, total as f64 / toks.len().max(1) as f64)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut picked = Vec::new();
    let mut words = 0usize;
    for (i, _) in ranked {
        let w = word_count(sentences[i]);
        if !picked.is_empty() && words + w > budget {
            continue;
        }
        picked.push(i);
        words += w;
        if words >= budget {
            break;
        }
    }
    picked.sort_unstable();

    let joined = picked
        .into_iter()
        .map(|i| sentences[i])
        .collect::<Vec<_>>()
        .join(" ");
    if word_count(&joined) > budget {
        joined.split_whitespace().take(budget).collect::<Vec<_>>().join(" ")
    } else {
        joined
    }
}

#[async_trait]
impl Summarizer for LexiconModels {
    async fn summarize_chunk(
        &self,
        chunk: &str,
        max_length: usize,
        _min_length: usize,
    ) -> Result<String> {
        Ok(extractive_summary(chunk, max_length.min(LEAD_WORDS)))
    }
}

#[async_trait]
impl SentimentClassifier for LexiconModels {
    async fn classify_sentiment(&self, text: &str) -> Result<Classification> {
        let (score, _) = self.sentiment_score(text);
        let label = match score.signum() {
            1 => "positive",
            -1 => "negative",
            _ => "neutral",
        };
        let confidence = (0.5 + 0.1 * score.unsigned_abs() as f64).min(0.99);
        Ok(Classification::new(label, confidence))
    }
}

#[async_trait]
impl BiasClassifier for LexiconModels {
    async fn classify_bias(&self, text: &str) -> Result<Classification> {
        let p = self.bias_probability(text);
        Ok(if p >= 0.5 {
            Classification::new("biased", p)
        } else {
            Classification::new("neutral", 1.0 - p)
        })
    }
}

#[async_trait]
impl EntailmentScorer for LexiconModels {
    /// Share of the hypothesis' content words found in the premise.
    async fn entailment(&self, premise: &str, hypothesis: &str) -> Result<f64> {
        let wanted = content_tokens(hypothesis);
        if wanted.is_empty() {
            return Ok(0.0);
        }
        let have: HashSet<String> = content_tokens(premise).into_iter().collect();
        let found = wanted.iter().filter(|t| have.contains(*t)).count();
        Ok(found as f64 / wanted.len() as f64)
    }
}

#[async_trait]
impl SimilarityScorer for LexiconModels {
    async fn similarities(&self, source: &str, candidates: &[&str]) -> Result<Vec<f64>> {
        let src = content_tokens(source);
        Ok(candidates
            .iter()
            .map(|c| fuzzy_dice(&src, &content_tokens(c)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_handles_negation() {
        let m = LexiconModels::new();
        assert!(m.sentiment_score("This is good").0 > 0);
        assert!(m.sentiment_score("This is not good").0 < 0);
        assert_eq!(m.sentiment_score("The meeting is on Tuesday").0, 0);
    }

    #[tokio::test]
    async fn sentiment_labels() {
        let m = LexiconModels::new();
        let neg = m.classify_sentiment("A terrible disaster and a hoax").await.unwrap();
        assert_eq!(neg.label, "negative");
        assert!(neg.confidence > 0.5 && neg.confidence <= 0.99);
        let neu = m.classify_sentiment("The meeting is on Tuesday").await.unwrap();
        assert_eq!(neu.label, "neutral");
    }

    #[tokio::test]
    async fn loaded_language_reads_as_biased() {
        let m = LexiconModels::new();
        let b = m
            .classify_bias("Vaccines are a government conspiracy! They harm us all.")
            .await
            .unwrap();
        assert_eq!(b.label, "biased");
        let n = m.classify_bias("The Earth revolves around the Sun.").await.unwrap();
        assert_eq!(n.label, "neutral");
        assert!((n.confidence - 0.85).abs() < 1e-9);
    }

    #[tokio::test]
    async fn entailment_is_content_overlap() {
        let m = LexiconModels::new();
        let full = m
            .entailment(
                "Astronomers confirm the Earth revolves around the Sun once a year.",
                "The Earth revolves around the Sun.",
            )
            .await
            .unwrap();
        assert_eq!(full, 1.0);
        let none = m
            .entailment("Stock prices fell on Monday.", "The Earth revolves around the Sun.")
            .await
            .unwrap();
        assert_eq!(none, 0.0);
    }

    #[tokio::test]
    async fn similarity_ranks_related_text_higher() {
        let m = LexiconModels::new();
        let src = "The Earth revolves around the Sun in an elliptical orbit.";
        let sims = m
            .similarities(
                src,
                &[
                    "Earth's orbit around the Sun is elliptical; the Earth revolves yearly.",
                    "Quarterly earnings beat analyst expectations at the bank.",
                ],
            )
            .await
            .unwrap();
        assert!(sims[0] > sims[1], "{sims:?}");
        assert!(sims.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn extractive_summary_respects_budget_and_order() {
        let text = "Solar panels cut energy bills. Panels on roofs make solar energy cheap. \
                    The weather was mild. Energy from solar panels keeps growing.";
        let s = extractive_summary(text, 12);
        assert!(word_count(&s) <= 12, "{s}");
        assert!(!s.is_empty());
        assert!(!s.contains("weather"));
    }
}
