// tests/pipeline_isolation.rs
//
// End-to-end pipeline runs over fakes: scoring, failure isolation,
// the one fatal error and reference handling.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use credibility_analyzer::config::AppConfig;
use credibility_analyzer::models::ModelRegistry;
use credibility_analyzer::retrieve::DisabledRetriever;
use credibility_analyzer::{Components, EvaluateResponse, Pipeline, PipelineError, SignalResult};

const CLAIM: &str = "The Earth revolves around the Sun.";

#[tokio::test]
async fn text_input_gets_placeholder_title_and_weighted_score() {
    let report = pipeline(happy_components()).evaluate(CLAIM).await.unwrap();

    assert_eq!(report.title, "User provided content");
    assert_eq!(report.summary, "The Earth revolves around the");
    assert_eq!(report.final_score(), 0.82);
    assert!((report.credibility.raw_score - 0.8175).abs() < 1e-9);
    assert_eq!(report.fact_check.label, "supported");
    assert_eq!(report.related_articles.len(), 2);
    assert_eq!(report.related_articles[0].url, "https://news.example.org/1");
}

#[tokio::test]
async fn url_input_uses_extracted_title() {
    let report = pipeline(happy_components())
        .evaluate("  https://example.org/story ")
        .await
        .unwrap();
    assert_eq!(report.title, "Earth and Sun");
}

#[tokio::test]
async fn failing_module_scores_zero_and_keeps_its_weight() {
    let parts = Components {
        sentiment: Arc::new(FailingSignal("sentiment model crashed")),
        ..happy_components()
    };
    let report = pipeline(parts).evaluate(CLAIM).await.unwrap();

    assert_eq!(report.sentiment.label, "error");
    assert_eq!(report.sentiment.score, 0.0);
    assert!(report.sentiment.reason.contains("sentiment model crashed"));
    // 0.4*0.9 + 0.3*0.8 + 0.15*0.95 + 0.15*0.0
    assert!((report.credibility.raw_score - 0.7425).abs() < 1e-9);
    assert_eq!(report.final_score(), 0.74);
    assert_eq!(report.credibility.breakdown.sentiment_analysis.weight, 0.15);
    // other modules untouched
    assert_eq!(report.bias.score, 0.95);
}

#[tokio::test]
async fn slow_module_times_out_into_error_result() {
    let mut cfg = AppConfig::default();
    cfg.pipeline.module_timeout_secs = 1;
    let parts = Components {
        bias: Arc::new(SlowSignal(Duration::from_secs(10))),
        ..happy_components()
    };
    let report = Pipeline::new(parts, &cfg).evaluate(CLAIM).await.unwrap();
    assert_eq!(report.bias.label, "error");
    assert_eq!(report.bias.score, 0.0);
    assert!(report.bias.reason.contains("timed out"), "{}", report.bias.reason);
}

#[tokio::test]
async fn failed_retrieval_leaves_cross_checks_with_insufficient_data() {
    let cfg = AppConfig::default();
    let models = ModelRegistry::local();
    let mut parts = Components::from_registry(
        &models,
        &cfg,
        happy_components().extractor,
        Arc::new(FailingRetriever),
    );
    parts.summarizer = Arc::new(FirstWords);
    let report = Pipeline::new(parts, &cfg).evaluate(CLAIM).await.unwrap();

    assert!(report.related_articles.is_empty());
    assert_eq!(report.fact_check.label, "unverified");
    assert_eq!(report.fact_check.score, 0.5);
    assert_eq!(report.similarity.label, "insufficient_data");
    assert_eq!(report.similarity.score, 0.5);
    for s in [&report.sentiment, &report.bias] {
        assert!((0.0..=1.0).contains(&s.score));
        assert!(!s.is_error(), "{s:?}");
    }
    assert!((0.0..=1.0).contains(&report.final_score()));
}

#[tokio::test]
async fn disabled_retriever_behaves_like_no_references() {
    let parts = Components {
        retriever: Arc::new(DisabledRetriever),
        ..happy_components()
    };
    let report = pipeline(parts).evaluate(CLAIM).await.unwrap();
    assert!(report.related_articles.is_empty());
}

#[tokio::test]
async fn extraction_failure_aborts_with_error_report() {
    let parts = Components {
        extractor: Arc::new(FakeExtractor { page: None }),
        ..happy_components()
    };
    let p = pipeline(parts);

    let err = p.evaluate("https://unreachable.example").await.unwrap_err();
    assert!(matches!(err, PipelineError::ContentFetch(_)));

    match p.evaluate_or_error("https://unreachable.example").await {
        EvaluateResponse::Error(e) => {
            assert!(e.error.starts_with("Failed to extract content from URL"), "{}", e.error);
            assert!(e.error.contains("connection refused"));
            assert_eq!(e.final_credibility_score, 0.0);
        }
        EvaluateResponse::Report(_) => panic!("expected an error report"),
    }
}

#[tokio::test]
async fn summarization_failure_leaves_summary_empty() {
    let parts = Components {
        summarizer: Arc::new(FailingSummarizer),
        ..happy_components()
    };
    let report = pipeline(parts).evaluate(CLAIM).await.unwrap();
    assert_eq!(report.summary, "");
    assert_eq!(report.final_score(), 0.82);
    assert_eq!(report.related_articles.len(), 2);
}

#[tokio::test]
async fn blank_input_still_gets_a_report() {
    let report = pipeline(happy_components()).evaluate("   \n").await.unwrap();
    assert_eq!(report.title, "User provided content");
    assert_eq!(report.summary, "");
    assert!((0.0..=1.0).contains(&report.final_score()));
}

#[tokio::test]
async fn non_finite_module_score_becomes_error_result() {
    let parts = Components {
        similarity: Arc::new(FixedSignal(SignalResult::new("highly_similar", f64::NAN, "odd"))),
        ..happy_components()
    };
    let report = pipeline(parts).evaluate(CLAIM).await.unwrap();
    assert!(report.similarity.is_error());
    assert_eq!(report.similarity.score, 0.0);
    assert!(report.similarity.reason.contains("non-finite"), "{}", report.similarity.reason);
    // 0.4*0.9 + 0.3*0.0 + 0.15*0.95 + 0.15*0.5
    assert!((report.credibility.raw_score - 0.5775).abs() < 1e-9);
    assert!(report.final_score().is_finite());
}

#[tokio::test]
async fn over_delivering_retriever_is_capped() {
    let parts = Components {
        retriever: FakeRetriever::new((0..8).map(reference).collect()),
        ..happy_components()
    };
    let report = pipeline(parts).evaluate(CLAIM).await.unwrap();
    assert_eq!(report.related_articles.len(), 5);
}

#[tokio::test]
async fn query_is_the_first_200_chars() {
    let retriever = FakeRetriever::new(vec![]);
    let parts = Components {
        retriever: retriever.clone(),
        ..happy_components()
    };
    let body = "ž".repeat(500);
    pipeline(parts).evaluate(&body).await.unwrap();

    let queries = retriever.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].chars().count(), 200);
}
