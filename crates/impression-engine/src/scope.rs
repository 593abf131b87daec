//! Three-level scope resolution of a marker's sentiment
//!
//! Signals are looked up in the marker's phrase first, then in its sentence,
//! then in the sentence with its neighbours. The first level holding any
//! signal decides the sentiment by weighted majority.

use crate::collector::weigh;
use crate::text::Segmentation;
use impression_core::{Sentiment, SentimentWord, MAX_EVIDENCE};
use std::ops::Range;

/// Which window decided the sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLevel {
    Phrase,
    Sentence,
    Neighbourhood,
    /// No signal in any window
    Unresolved,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeResolution {
    pub sentiment: Sentiment,
    pub evidence: Vec<String>,
    pub level: ScopeLevel,
}

/// Resolve the sentiment around `offset`
pub fn resolve(
    offset: usize,
    words: &[SentimentWord],
    segmentation: &Segmentation,
) -> ScopeResolution {
    let levels = [
        ScopeLevel::Phrase,
        ScopeLevel::Sentence,
        ScopeLevel::Neighbourhood,
    ];

    for (level, window) in levels.into_iter().zip(segmentation.windows(offset)) {
        let in_window: Vec<&SentimentWord> = words.iter().filter(|w| within(w, &window)).collect();
        let (positive, negative) = weigh(in_window.iter().copied());
        if positive + negative == 0 {
            continue;
        }

        return ScopeResolution {
            sentiment: Sentiment::from_counts(positive, negative),
            evidence: in_window
                .iter()
                .take(MAX_EVIDENCE)
                .map(|w| w.surface.clone())
                .collect(),
            level,
        };
    }

    ScopeResolution {
        sentiment: Sentiment::Neutral,
        evidence: Vec::new(),
        level: ScopeLevel::Unresolved,
    }
}

fn within(word: &SentimentWord, window: &Range<usize>) -> bool {
    window.contains(&word.offset)
}
