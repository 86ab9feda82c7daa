// src/text.rs
//! Small text helpers shared by the extractor, the signal modules and the
//! pipeline: HTML-ish normalization, char-safe truncation, sentence split,
//! tokenization and anonymized ids for logs.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Normalize a fragment of markup into plain text:
/// decode entities, strip tags, ASCII-fy curly quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();
    let stripped = RE_TAGS.replace_all(&decoded, " ");
    let quoted = stripped
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    RE_WS.replace_all(&quoted, " ").trim().to_string()
}

/// Borrow at most `max` characters of `s` (never splits a UTF-8 sequence).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Split text into sentences on `.`, `!` or `?` followed by whitespace.
/// Empty fragments are dropped; terminal punctuation is kept.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let next_is_ws = chars.peek().map(|(_, n)| n.is_whitespace()).unwrap_or(true);
            if next_is_ws {
                let end = i + c.len_utf8();
                let s = text[start..end].trim();
                if !s.is_empty() {
                    out.push(s);
                }
                start = end;
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// Alphanumeric lower-case tokens (apostrophes kept so "isn't" survives).
pub fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// Number of whitespace separated words.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Short, stable id for a text body. Logs carry this instead of raw content.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
