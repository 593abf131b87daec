//! Orchestration: lexicon tags plus a strategy-chosen sentiment score

use crate::classifier::Classifier;
use crate::config::EngineConfig;
use crate::engine::{is_blank, AnalysisEngine};
use crate::ml::{MlSentimentClassifier, SentimentPrediction};
use crate::scoring::ScoringStrategy;
use async_trait::async_trait;
use impression_core::{AnalysisResult, Result};
use std::sync::Arc;

/// `(text, rating) → (tags, score)`; never fails
#[async_trait]
pub trait ReviewAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str, rating: u8) -> AnalysisResult;
}

pub struct ImpressionAnalyzer {
    engine: Arc<AnalysisEngine>,
    classifier: Option<Arc<dyn Classifier>>,
    strategy: ScoringStrategy,
}

impl ImpressionAnalyzer {
    /// Lexicon-ratio analyzer without a classifier
    pub fn new(engine: Arc<AnalysisEngine>) -> Self {
        Self {
            engine,
            classifier: None,
            strategy: ScoringStrategy::default(),
        }
    }

    /// Engine, strategy and (for `ml_confidence`) the fallback classifier from config
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let engine = Arc::new(AnalysisEngine::new(config)?);
        let mut analyzer = Self::new(engine).with_strategy(config.scoring);

        if matches!(config.scoring, ScoringStrategy::MlConfidence { .. }) {
            analyzer = analyzer.with_classifier(Arc::new(MlSentimentClassifier::new(
                config.ml.clone(),
            )));
        }

        Ok(analyzer)
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_strategy(mut self, strategy: ScoringStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn engine(&self) -> &Arc<AnalysisEngine> {
        &self.engine
    }

    pub fn strategy(&self) -> ScoringStrategy {
        self.strategy
    }

    async fn predict(&self, text: &str) -> Option<SentimentPrediction> {
        let classifier = self.classifier.as_ref()?;
        match classifier.classify(text).await {
            Ok(result) => Some(SentimentPrediction::from_result(&result)),
            Err(e) => {
                tracing::warn!("Classifier '{}' failed: {}", classifier.name(), e);
                metrics::counter!("impression_ml_fallback_total", "reason" => "classifier_error")
                    .increment(1);
                Some(SentimentPrediction::neutral())
            }
        }
    }
}

#[async_trait]
impl ReviewAnalyzer for ImpressionAnalyzer {
    async fn analyze(&self, text: &str, rating: u8) -> AnalysisResult {
        if is_blank(text) {
            return self.engine.empty_result(rating);
        }

        let analysis = self.engine.find_tags(text);
        let weights = analysis.weights();

        let prediction = if self.strategy.needs_prediction(weights) {
            self.predict(text).await
        } else {
            None
        };

        let score = self.strategy.score(weights, rating, prediction.as_ref());
        AnalysisResult::new(analysis.tags, score)
    }
}

