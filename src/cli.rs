// src/cli.rs
//! Interactive console front-end: prompt for input, print a readable report.
//! I/O is generic so the prompt flow can be driven from tests.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::report::AnalysisReport;
use crate::signal::SignalKind;

const RULE: &str = "============================================================";

pub fn print_banner<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "CONTENT CREDIBILITY ANALYZER")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "This tool analyzes the credibility of content based on")?;
    writeln!(out, "fact-checking, similarity to other sources, sentiment, and bias.")?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

/// Ask for an input type and read the input. `None` when nothing was
/// entered (or stdin closed).
pub fn read_request<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<String>> {
    writeln!(out, "Select input type:")?;
    writeln!(out, "1. URL")?;
    writeln!(out, "2. Article text")?;
    writeln!(out, "3. Claim/statement")?;
    write!(out, "Enter your choice (1-3): ")?;
    out.flush()?;

    let Some(choice) = read_line(input)? else {
        return Ok(None);
    };

    let text = if choice.trim() == "1" {
        write!(out, "Enter URL: ")?;
        out.flush()?;
        read_line(input)?.map(|l| l.trim().to_string()).unwrap_or_default()
    } else {
        writeln!(out, "Enter your text (press Enter twice when done):")?;
        out.flush()?;
        let mut lines = Vec::new();
        while let Some(line) = read_line(input)? {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        lines.join("\n")
    };

    Ok(if text.trim().is_empty() { None } else { Some(text) })
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut buf = String::new();
    let n = input.read_line(&mut buf).context("reading stdin")?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
}

fn shout(label: &str) -> String {
    label.replace('_', " ").to_uppercase()
}

pub fn render_report(report: &AnalysisReport, analyzed_at: DateTime<Utc>) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "\n{RULE}");
    let _ = writeln!(s, "ANALYSIS RESULTS");
    let _ = writeln!(s, "{RULE}");
    let _ = writeln!(s, "TITLE: {}", report.title);
    let _ = writeln!(s, "\nSUMMARY:\n{}", report.summary);
    let _ = writeln!(s, "\nCREDIBILITY SCORE:\n{:.2}/1.00", report.final_score());

    let _ = writeln!(s, "\nCREDIBILITY BREAKDOWN:");
    for (kind, c) in report.credibility.breakdown.iter() {
        let _ = writeln!(
            s,
            "- {}: {:.2} (weight: {:.2})",
            kind.display_name(),
            c.score,
            c.weight
        );
    }

    let fc = report.signal(SignalKind::FactChecker);
    let _ = writeln!(s, "\nFACT CHECK RESULTS:");
    let _ = writeln!(s, "Verdict: {}", shout(&fc.label));
    let _ = writeln!(s, "Confidence: {:.2}", fc.score);
    let _ = writeln!(s, "Reason: {}", fc.reason);

    let sim = report.signal(SignalKind::SimilarityChecker);
    let _ = writeln!(s, "\nSIMILARITY ANALYSIS:");
    let _ = writeln!(s, "Finding: {}", shout(&sim.label));
    let _ = writeln!(s, "Score: {:.2}", sim.score);
    let _ = writeln!(s, "Reason: {}", sim.reason);

    let tone = report.signal(SignalKind::SentimentAnalysis);
    let _ = writeln!(s, "\nSENTIMENT ANALYSIS:");
    let _ = writeln!(s, "Tone: {}", shout(&tone.label));
    let _ = writeln!(s, "Reason: {}", tone.reason);

    let bias = report.signal(SignalKind::BiasDetector);
    let _ = writeln!(s, "\nBIAS ANALYSIS:");
    let _ = writeln!(s, "Finding: {}", shout(&bias.label));
    let _ = writeln!(s, "Score: {:.2}", bias.score);
    let _ = writeln!(s, "Reason: {}", bias.reason);

    if !report.related_articles.is_empty() {
        let _ = writeln!(s, "\nRELATED ARTICLES:");
        for a in &report.related_articles {
            let _ = writeln!(s, "- {} <{}>", a.title, a.url);
        }
    }

    let _ = writeln!(s, "\nAnalyzed at {}", analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(s, "{RULE}");
    s
}

pub fn render_error(message: &str) -> String {
    format!("Error: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{aggregate, ModuleScores, Weights};
    use crate::report::RelatedArticle;
    use crate::signal::SignalResult;
    use chrono::TimeZone;
    use std::io::Cursor;

    fn read(stdin: &str) -> Option<String> {
        let mut out = Vec::new();
        read_request(&mut Cursor::new(stdin.as_bytes()), &mut out).unwrap()
    }

    #[test]
    fn url_choice_reads_one_line() {
        assert_eq!(read("1\n  https://example.org/a  \n").as_deref(), Some("https://example.org/a"));
    }

    #[test]
    fn text_choice_stops_at_blank_line() {
        assert_eq!(
            read("2\nThe Earth revolves\naround the Sun.\n\nignored\n").as_deref(),
            Some("The Earth revolves\naround the Sun.")
        );
        assert_eq!(read("3\nA claim.").as_deref(), Some("A claim."));
    }

    #[test]
    fn nothing_entered_is_none() {
        assert_eq!(read(""), None);
        assert_eq!(read("2\n\n"), None);
    }

    #[test]
    fn report_lists_every_module() {
        let scores = ModuleScores {
            fact_checker: 0.9,
            similarity_checker: 0.8,
            bias_detector: 0.95,
            sentiment_analysis: 0.5,
        };
        let report = AnalysisReport {
            title: "User provided content".into(),
            summary: "Earth orbits the Sun.".into(),
            credibility: aggregate(&scores, &Weights::DEFAULT),
            fact_check: SignalResult::new("partially_supported", 0.9, "ok"),
            similarity: SignalResult::new("highly_similar", 0.8, "close"),
            sentiment: SignalResult::new("neutral", 0.5, "flat"),
            bias: SignalResult::new("neutral", 0.95, "calm"),
            related_articles: vec![RelatedArticle {
                title: "Sun facts".into(),
                url: "https://example.org/sun".into(),
            }],
        };
        let at = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        let text = render_report(&report, at);
        assert!(text.contains("0.82/1.00"));
        assert!(text.contains("- Fact Checker: 0.90 (weight: 0.40)"));
        assert!(text.contains("- Sentiment Analysis: 0.50 (weight: 0.15)"));
        assert!(text.contains("Verdict: PARTIALLY SUPPORTED"));
        assert!(text.contains("- Sun facts <https://example.org/sun>"));
        assert!(text.contains("Analyzed at 2025-06-03 10:00:00 UTC"));
    }

    #[test]
    fn error_line() {
        assert_eq!(render_error("boom"), "Error: boom");
    }
}
