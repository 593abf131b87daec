//! The ML fallback never fails, whatever the input or model state

use impression_core::Sentiment;
use impression_engine::{
    Classifier, EngineConfig, ImpressionAnalyzer, MlConfig, MlSentimentClassifier,
    ModelSourceSpec, ReviewAnalyzer, ScoringStrategy,
};
use std::path::PathBuf;

fn missing_models() -> MlConfig {
    MlConfig {
        onnx_dir: Some(PathBuf::from("/nonexistent/onnx-model")),
        pipeline: Some(ModelSourceSpec::Local {
            path: PathBuf::from("/nonexistent/pipeline-model"),
        }),
        ..Default::default()
    }
}

#[test]
fn test_long_and_empty_input() {
    let classifier = MlSentimentClassifier::new(missing_models());
    let long = "The food was great but the service was slow. ".repeat(250);
    assert!(long.len() >= 10_000);

    for text in [long.as_str(), "", "   "] {
        let prediction = classifier.predict(text);
        assert_eq!(prediction.label, Sentiment::Neutral);
        assert_eq!(prediction.confidence, 0.5);
    }
}

#[test]
fn test_garbage_model_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "not json").unwrap();
    std::fs::write(dir.path().join("model.safetensors"), b"\x00\x01garbage").unwrap();
    std::fs::write(dir.path().join("model.onnx"), b"garbage").unwrap();

    let classifier = MlSentimentClassifier::new(MlConfig {
        onnx_dir: Some(dir.path().to_path_buf()),
        pipeline: Some(ModelSourceSpec::Local {
            path: dir.path().to_path_buf(),
        }),
        ..Default::default()
    });

    assert!(!classifier.is_available());
    let prediction = classifier.predict("Lovely evening");
    assert_eq!(prediction.label, Sentiment::Neutral);
}

#[tokio::test]
async fn test_classify_never_errors() {
    let classifier = MlSentimentClassifier::new(missing_models());
    let result = classifier.classify(&"x".repeat(10_000)).await.unwrap();
    assert_eq!(result.label, "neutral");
    assert_eq!(result.score, 0.5);
}

#[tokio::test]
async fn test_analyzer_from_config_without_model() {
    let yaml = r#"
lexicon:
  general_lexicon_path: null
scoring:
  type: ml_confidence
ml:
  onnx_dir: /nonexistent/onnx-model
"#;
    let config = EngineConfig::from_yaml(yaml).unwrap();
    let analyzer = ImpressionAnalyzer::from_config(&config).unwrap();
    assert_eq!(analyzer.strategy(), ScoringStrategy::ml_confidence());

    // No model: neutral 0.5 is below the confidence gate, so the rating decides
    let result = analyzer.analyze("The pizza arrived", 5).await;
    assert_eq!(result.sentiment_score, 1.0);
}
