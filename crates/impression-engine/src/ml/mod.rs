//! ML sentiment fallback
//!
//! A whole-text classifier consulted when the lexicon signal is too weak to
//! score a review. Two backends are tried in order: a compiled ONNX graph
//! (feature `onnx`) and a transformer pipeline run with Candle. When neither
//! loads, every prediction is `(neutral, 0.5)`.

mod fallback;
mod loader;
#[cfg(feature = "onnx")]
mod onnx;
mod pipeline;

pub use fallback::MlSentimentClassifier;
pub use pipeline::PipelineBackend;

#[cfg(feature = "onnx")]
pub use onnx::OnnxBackend;

use crate::classifier::ClassificationResult;
use impression_core::{Result, Sentiment};

/// Confidence reported when no model could produce a prediction
pub const NEUTRAL_CONFIDENCE: f32 = 0.5;

/// Label and confidence of one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentPrediction {
    pub label: Sentiment,
    /// Probability of `label`, in [0, 1]
    pub confidence: f32,
}

impl SentimentPrediction {
    pub fn neutral() -> Self {
        Self {
            label: Sentiment::Neutral,
            confidence: NEUTRAL_CONFIDENCE,
        }
    }

    /// Confidence signed by label and rounded to two decimals; neutral is 0
    pub fn signed_score(&self) -> f32 {
        let rounded = (self.confidence.clamp(0.0, 1.0) * 100.0).round() / 100.0;
        match self.label {
            Sentiment::Positive => rounded,
            Sentiment::Negative => -rounded,
            Sentiment::Neutral => 0.0,
        }
    }

    /// Read a classifier result; unknown labels count as neutral
    pub fn from_result(result: &ClassificationResult) -> Self {
        match Sentiment::parse(&result.label) {
            Some(label) if result.score.is_finite() => Self {
                label,
                confidence: result.score.clamp(0.0, 1.0),
            },
            _ => Self::neutral(),
        }
    }

    /// Arg-max over per-label probabilities
    pub fn from_probabilities(labels: &[String], probabilities: &[f32]) -> Option<Self> {
        let (index, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;

        let label = Sentiment::parse(labels.get(index)?)?;
        Some(Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }
}

/// A loaded model that turns text into per-label probabilities
pub trait InferenceBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Probabilities in the configured label order
    fn probabilities(&self, text: &str) -> Result<Vec<f32>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["neutral", "positive", "negative"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_signed_score() {
        let p = SentimentPrediction {
            label: Sentiment::Negative,
            confidence: 0.876,
        };
        assert_eq!(p.signed_score(), -0.88);
        assert_eq!(SentimentPrediction::neutral().signed_score(), 0.0);
    }

    #[test]
    fn test_from_probabilities() {
        let p = SentimentPrediction::from_probabilities(&labels(), &[0.1, 0.7, 0.2]).unwrap();
        assert_eq!(p.label, Sentiment::Positive);
        assert!((p.confidence - 0.7).abs() < 1e-6);

        assert!(SentimentPrediction::from_probabilities(&labels(), &[]).is_none());
        assert!(SentimentPrediction::from_probabilities(&labels(), &[0.0, 0.0, 0.0, 0.9]).is_none());
    }

    #[test]
    fn test_from_result() {
        let result = ClassificationResult::new("NEGATIVE", 0.8);
        let p = SentimentPrediction::from_result(&result);
        assert_eq!(p.label, Sentiment::Negative);

        let odd = ClassificationResult::new("label_7", 0.99);
        assert_eq!(SentimentPrediction::from_result(&odd), SentimentPrediction::neutral());
    }
}
