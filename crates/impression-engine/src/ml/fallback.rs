//! The fallback classifier: lazy backend selection and failure containment

use super::{InferenceBackend, PipelineBackend, SentimentPrediction};
use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
use crate::config::MlConfig;
use impression_core::Result;
use std::sync::OnceLock;
use std::time::Instant;

const UNAVAILABLE: &str = "unavailable";

/// Whole-text sentiment classifier that never fails.
///
/// The backend is chosen on first use: ONNX model, then transformer
/// pipeline, then none. Input is cut to `max_length` characters before
/// tokenization and to `max_length` tokens by the tokenizer. Any error
/// yields `(neutral, 0.5)`.
pub struct MlSentimentClassifier {
    config: MlConfig,
    backend: OnceLock<Option<Box<dyn InferenceBackend>>>,
}

impl MlSentimentClassifier {
    pub fn new(config: MlConfig) -> Self {
        Self {
            config,
            backend: OnceLock::new(),
        }
    }

    /// Use an already-loaded backend
    pub fn with_backend(config: MlConfig, backend: Box<dyn InferenceBackend>) -> Self {
        let classifier = Self::new(config);
        let _ = classifier.backend.set(Some(backend));
        classifier
    }

    /// Whether a model loaded (loads it on first call)
    pub fn is_available(&self) -> bool {
        self.backend().is_some()
    }

    /// Name of the loaded backend
    pub fn backend_name(&self) -> &str {
        self.backend().map_or(UNAVAILABLE, |b| b.name())
    }

    pub fn predict(&self, text: &str) -> SentimentPrediction {
        self.infer(text).0
    }

    /// Prediction plus the per-label probabilities it came from
    fn infer(&self, text: &str) -> (SentimentPrediction, Option<Vec<(String, f32)>>) {
        let text = truncate_chars(text.trim(), self.config.max_length);
        if text.is_empty() {
            return (SentimentPrediction::neutral(), None);
        }

        let Some(backend) = self.backend() else {
            metrics::counter!("impression_ml_fallback_total", "reason" => UNAVAILABLE)
                .increment(1);
            return (SentimentPrediction::neutral(), None);
        };

        let probabilities = match backend.probabilities(text) {
            Ok(probabilities) => probabilities,
            Err(e) => {
                tracing::warn!("Sentiment inference failed: {}", e);
                metrics::counter!("impression_ml_fallback_total", "reason" => "inference_error")
                    .increment(1);
                return (SentimentPrediction::neutral(), None);
            }
        };

        match SentimentPrediction::from_probabilities(&self.config.labels, &probabilities) {
            Some(prediction) => {
                let scores = self
                    .config
                    .labels
                    .iter()
                    .cloned()
                    .zip(probabilities)
                    .collect();
                (prediction, Some(scores))
            }
            None => {
                tracing::warn!(
                    "Model output does not match labels {:?}",
                    self.config.labels
                );
                metrics::counter!("impression_ml_fallback_total", "reason" => "label_mismatch")
                    .increment(1);
                (SentimentPrediction::neutral(), None)
            }
        }
    }

    fn backend(&self) -> Option<&dyn InferenceBackend> {
        self.backend
            .get_or_init(|| load_backend(&self.config))
            .as_deref()
    }
}

fn load_backend(config: &MlConfig) -> Option<Box<dyn InferenceBackend>> {
    if let Some(backend) = load_onnx(config) {
        return Some(backend);
    }

    if let Some(source) = &config.pipeline {
        match PipelineBackend::load(
            source,
            config.labels.len(),
            config.max_length,
            config.device,
        ) {
            Ok(backend) => return Some(Box::new(backend)),
            Err(e) => tracing::warn!("Sentiment pipeline unavailable: {}", e),
        }
    }

    tracing::warn!("No ML sentiment model loaded; fallback predictions are neutral");
    None
}

#[cfg(feature = "onnx")]
fn load_onnx(config: &MlConfig) -> Option<Box<dyn InferenceBackend>> {
    let dir = config.onnx_dir.as_ref()?;
    match super::OnnxBackend::load(dir, config.max_length) {
        Ok(backend) => Some(Box::new(backend)),
        Err(e) => {
            tracing::warn!("ONNX sentiment model unavailable: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(config: &MlConfig) -> Option<Box<dyn InferenceBackend>> {
    if config.onnx_dir.is_some() {
        tracing::warn!("ONNX model configured but built without the onnx feature");
    }
    None
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[async_trait::async_trait]
impl Classifier for MlSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let (prediction, all_scores) = self.infer(text);

        Ok(ClassificationResult {
            label: prediction.label.as_str().to_string(),
            score: prediction.confidence,
            metadata: ClassificationMetadata {
                model: Some(self.backend_name().to_string()),
                all_scores,
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        "ml-sentiment"
    }
}
