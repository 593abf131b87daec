//! Impression Engine
//!
//! Lexicon and morphology driven analysis of customer reviews for the
//! hospitality domain: `(text, rating)` in, aspect tags and an overall
//! sentiment score out.
//!
//! The pipeline, per review:
//! - case folding, tokenization and phrase/sentence segmentation ([`text`])
//! - lemmatization with a bounded memo ([`morphology`])
//! - sentiment signal collection: structural patterns, phrases, negation
//!   and single words ([`collector`])
//! - category markers ([`markers`]) resolved against widening scope windows
//!   ([`scope`]) and assembled into deduplicated tags ([`tags`])
//! - an overall score chosen by a [`ScoringStrategy`], optionally backed by
//!   the [`ml`] fallback classifier
//!
//! [`AnalysisEngine`] owns all lexicons and compiled matchers;
//! [`ImpressionAnalyzer`] adds the scoring strategy and classifier.

pub mod analyzer;
pub mod classifier;
pub mod collector;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod lexicon;
pub mod markers;
pub mod ml;
pub mod morphology;
pub mod patterns;
pub mod scope;
pub mod scoring;
pub mod tags;
pub mod text;

pub use analyzer::{ImpressionAnalyzer, ReviewAnalyzer};
pub use classifier::{ClassificationMetadata, ClassificationResult, Classifier};
pub use config::{DeviceSpec, EngineConfig, MlConfig, ModelSourceSpec};
pub use conflict::is_complex;
pub use engine::{AnalysisEngine, LexiconAnalysis};
pub use lexicon::{GeneralLexicon, LexiconStore, PhrasePattern};
pub use markers::CategoryLexicon;
pub use ml::{MlSentimentClassifier, SentimentPrediction};
pub use morphology::{Lemmatizer, MorphologicalNormalizer};
pub use scoring::ScoringStrategy;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analyzer::{ImpressionAnalyzer, ReviewAnalyzer};
    pub use crate::config::EngineConfig;
    pub use crate::conflict::is_complex;
    pub use crate::engine::AnalysisEngine;
    pub use crate::scoring::ScoringStrategy;
    pub use impression_core::prelude::*;
}
