//! Overall sentiment score strategies

use crate::ml::SentimentPrediction;
use impression_core::Sentiment;
use serde::{Deserialize, Serialize};

/// Strategy choosing a review's overall `sentiment_score`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// `(positive - negative) / (positive + negative)` over weighted signals,
    /// or the rating score when there is no signal
    LexiconRatio,

    /// Lexicon ratio, unless the lexicon signal is weak; then the classifier's
    /// signed confidence when it is confident enough, else the rating score
    MlConfidence {
        #[serde(default = "default_min_confidence")]
        min_confidence: f32,
        #[serde(default = "default_min_lexicon_signal")]
        min_lexicon_signal: u32,
    },

    /// Always the rating score
    RatingFallback,
}

impl Default for ScoringStrategy {
    fn default() -> Self {
        Self::LexiconRatio
    }
}

impl ScoringStrategy {
    /// `ml_confidence` with its default thresholds
    pub fn ml_confidence() -> Self {
        Self::MlConfidence {
            min_confidence: default_min_confidence(),
            min_lexicon_signal: default_min_lexicon_signal(),
        }
    }

    /// Whether a classifier prediction is needed for weighted totals `(pos, neg)`
    pub fn needs_prediction(&self, weights: (u32, u32)) -> bool {
        match self {
            Self::MlConfidence {
                min_lexicon_signal,
                ..
            } => weights.0 + weights.1 < *min_lexicon_signal,
            _ => false,
        }
    }

    /// Score for a non-empty review
    pub fn score(
        &self,
        weights: (u32, u32),
        rating: u8,
        prediction: Option<&SentimentPrediction>,
    ) -> f32 {
        match self {
            Self::LexiconRatio => lexicon_ratio(weights).unwrap_or_else(|| rating_score(rating)),
            Self::MlConfidence { min_confidence, .. } => {
                if !self.needs_prediction(weights) {
                    return lexicon_ratio(weights).unwrap_or_else(|| rating_score(rating));
                }
                match prediction {
                    Some(p) if p.confidence >= *min_confidence => p.signed_score(),
                    _ => rating_score(rating),
                }
            }
            Self::RatingFallback => rating_score(rating),
        }
    }
}

/// Weighted word-count ratio in [-1, 1]; `None` without any signal
pub fn lexicon_ratio((positive, negative): (u32, u32)) -> Option<f32> {
    let total = positive + negative;
    if total == 0 {
        return None;
    }
    Some((positive as f32 - negative as f32) / total as f32)
}

/// +1, -1 or 0 from the rating alone
pub fn rating_score(rating: u8) -> f32 {
    Sentiment::from_rating(rating).unit_score()
}

fn default_min_confidence() -> f32 {
    0.6
}

fn default_min_lexicon_signal() -> u32 {
    2
}
