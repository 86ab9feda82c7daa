// src/analyze/mod.rs
//! Signal modules and the aggregator that turns their scores into one
//! credibility value.

pub mod bias;
pub mod fact_check;
pub mod scoring;
pub mod sentiment;
pub mod similarity;
pub mod weights;

pub use bias::BiasDetector;
pub use fact_check::FactChecker;
pub use scoring::{
    aggregate, CredibilityBreakdown, CredibilityResult, ModuleContribution, ModuleScores,
};
pub use sentiment::SentimentAnalysis;
pub use similarity::SimilarityChecker;
pub use weights::Weights;
