//! Mock classifiers for testing
//!
//! Configurable implementations of the Classifier trait used to exercise
//! the scoring strategies and the classifier failure path.

use async_trait::async_trait;
use impression_core::{Error, Result, Sentiment};
use impression_engine::classifier::ClassificationMetadata;
use impression_engine::{
    AnalysisEngine, ClassificationResult, Classifier, EngineConfig, ImpressionAnalyzer,
    ReviewAnalyzer, ScoringStrategy,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A configurable mock classifier
pub struct MockClassifier {
    name: String,
    score: f32,
    label: String,
    simulated_latency: Option<Duration>,
    call_count: AtomicU32,
}

impl MockClassifier {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            score: 0.5,
            label: "neutral".to_string(),
            simulated_latency: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the score this classifier will return
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Set the label this classifier will return
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Set simulated latency for this classifier
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    /// Get the number of times classify was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }

        Ok(ClassificationResult {
            label: self.label.clone(),
            score: self.score,
            metadata: ClassificationMetadata {
                model: Some(self.name.clone()),
                ..Default::default()
            },
            latency_us: self
                .simulated_latency
                .map(|d| d.as_micros() as u64)
                .unwrap_or(100),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A classifier that always fails
pub struct FailingClassifier {
    name: String,
    error_message: String,
}

impl FailingClassifier {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            error_message: "Simulated classifier failure".to_string(),
        }
    }

    /// Set a custom error message
    pub fn with_error(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }
}

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        Err(Error::classifier(self.error_message.clone()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn engine() -> Arc<AnalysisEngine> {
    let mut config = EngineConfig::default();
    config.lexicon.general_lexicon_path = None;
    Arc::new(AnalysisEngine::new(&config).unwrap())
}

fn analyzer(classifier: Arc<dyn Classifier>) -> ImpressionAnalyzer {
    ImpressionAnalyzer::new(engine())
        .with_strategy(ScoringStrategy::ml_confidence())
        .with_classifier(classifier)
}

#[tokio::test]
async fn test_weak_signal_uses_confident_classifier() {
    let mock = Arc::new(MockClassifier::new("mock").with_label("negative").with_score(0.9));
    let analyzer = analyzer(mock.clone());

    let result = analyzer.analyze("The pizza arrived", 5).await;
    assert_eq!(result.sentiment_score, -0.9);
    assert_eq!(mock.call_count(), 1);
    // Tags still come from the lexicon
    assert!(result.tags.iter().all(|t| t.sentiment == Sentiment::Neutral));
}

#[tokio::test]
async fn test_strong_signal_skips_classifier() {
    let mock = Arc::new(MockClassifier::new("mock").with_label("negative").with_score(0.99));
    let analyzer = analyzer(mock.clone());

    let result = analyzer.analyze("Great and delicious pizza", 1).await;
    assert_eq!(result.sentiment_score, 1.0);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_unsure_classifier_falls_back_to_rating() {
    let mock = Arc::new(MockClassifier::new("mock").with_label("positive").with_score(0.55));
    let analyzer = analyzer(mock.clone());

    let result = analyzer.analyze("The pizza arrived", 2).await;
    assert_eq!(result.sentiment_score, -1.0);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_failing_classifier_degrades() {
    let failing = Arc::new(FailingClassifier::new("broken").with_error("CUDA out of memory"));
    let analyzer = analyzer(failing);

    let result = analyzer.analyze("The pizza arrived", 4).await;
    assert_eq!(result.sentiment_score, 1.0);
    assert!(!result.tags.is_empty());
}

#[tokio::test]
async fn test_empty_text_never_reaches_classifier() {
    let mock = Arc::new(MockClassifier::new("mock").with_label("positive").with_score(1.0));
    let analyzer = analyzer(mock.clone());

    let result = analyzer.analyze("   ", 1).await;
    assert_eq!(result.sentiment_score, -1.0);
    assert_eq!(result.tags.len(), 1);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_rating_fallback_strategy() {
    let analyzer =
        ImpressionAnalyzer::new(engine()).with_strategy(ScoringStrategy::RatingFallback);
    let result = analyzer.analyze("Terrible rude waiter", 5).await;
    assert_eq!(result.sentiment_score, 1.0);
    assert!(result
        .tags
        .iter()
        .any(|t| t.sentiment == Sentiment::Negative));
}

#[tokio::test]
async fn test_lexicon_ratio_matches_engine() {
    let engine = engine();
    let analyzer = ImpressionAnalyzer::new(engine.clone());
    let text = "Tasty soup, slow service";
    assert_eq!(analyzer.analyze(text, 3).await, engine.analyze(text, 3));
}

#[tokio::test]
async fn test_classifier_latency_is_awaited() {
    let mock = Arc::new(
        MockClassifier::new("slow")
            .with_label("positive")
            .with_score(0.8)
            .with_latency(Duration::from_millis(5)),
    );
    let analyzer = analyzer(mock.clone());
    let result = analyzer.analyze("We had lunch", 1).await;
    assert_eq!(result.sentiment_score, 0.8);
}
