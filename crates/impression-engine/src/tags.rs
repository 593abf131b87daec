//! Tag assembly
//!
//! Turns category markers into impression tags: one tag per matched
//! subcategory, deduplicated by `(category, subcategory)` with the first
//! occurrence kept. The generic General tag is only kept when nothing more
//! specific was found, and is synthesized from the overall balance of
//! signals when no marker is present at all.

use crate::collector::CollectedSentiment;
use crate::markers::CategoryLexicon;
use crate::scope;
use crate::text::PreparedText;
use impression_core::{
    Category, CategoryMarker, ImpressionTag, Polarity, Sentiment, MAX_EVIDENCE,
};
use std::collections::HashSet;

/// Marker text used for tags that are not tied to a word
pub const NO_MARKER: &str = "-";

pub fn build_tags(
    markers: &[CategoryMarker],
    collected: &CollectedSentiment,
    text: &PreparedText<'_>,
    categories: &CategoryLexicon,
) -> Vec<ImpressionTag> {
    let mut tags = Vec::new();
    let mut seen = HashSet::new();

    for marker in markers {
        let resolution = scope::resolve(marker.offset, &collected.words, &text.segmentation);
        let window_lemmas = text.lemmas_within(&text.segmentation.neighbourhood(marker.offset));

        for subcategory in categories.disambiguate(marker.category, &window_lemmas) {
            if !seen.insert((marker.category, subcategory)) {
                continue;
            }
            tags.push(ImpressionTag::new(
                subcategory,
                resolution.sentiment,
                marker.marker_word.clone(),
                resolution.evidence.clone(),
            ));
        }
    }

    if tags.iter().any(|t| t.category != Category::General) {
        tags.retain(|t| t.category != Category::General);
    }

    if tags.is_empty() && !collected.is_empty() {
        tags.push(general_from_balance(collected));
    }

    tags
}

/// General tag from a weighted majority vote over every signal
fn general_from_balance(collected: &CollectedSentiment) -> ImpressionTag {
    let (positive, negative) = collected.weights();
    let sentiment = Sentiment::from_counts(positive, negative);

    let evidence: Vec<String> = match sentiment {
        Sentiment::Positive => surfaces(collected, Some(Polarity::Positive)),
        Sentiment::Negative => surfaces(collected, Some(Polarity::Negative)),
        Sentiment::Neutral => surfaces(collected, None),
    };

    ImpressionTag::general(sentiment, NO_MARKER, evidence)
}

fn surfaces(collected: &CollectedSentiment, polarity: Option<Polarity>) -> Vec<String> {
    collected
        .words
        .iter()
        .filter(|w| polarity.map_or(true, |p| w.polarity == p))
        .take(MAX_EVIDENCE)
        .map(|w| w.surface.clone())
        .collect()
}

/// The single tag produced for an empty review
pub fn empty_text_tag(rating: u8) -> ImpressionTag {
    ImpressionTag::general(Sentiment::from_rating(rating), NO_MARKER, Vec::new())
}
