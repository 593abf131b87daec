//! Property tests over generated reviews

use impression_core::Category;
use impression_engine::{AnalysisEngine, EngineConfig, MlConfig, MlSentimentClassifier};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::OnceLock;

const WORDS: &[&str] = &[
    "the", "a", "was", "were", "and", "but", "not", "no", "very", "never", "food", "waiter",
    "soup", "pizza", "coffee", "staff", "price", "bill", "table", "music", "toilet", "order",
    "delivery", "place", "great", "bad", "rude", "tasty", "cold", "slow", "friendly", "dirty",
    "cozy", "expensive", "waited", "hour", "HOURS", "forgot", "nobody", "came", "better",
    "elsewhere", "worth", "it", ",", ".", "!", "?", ";",
];

fn engine() -> &'static AnalysisEngine {
    static ENGINE: OnceLock<AnalysisEngine> = OnceLock::new();
    ENGINE.get_or_init(|| {
        let mut config = EngineConfig::default();
        config.lexicon.general_lexicon_path = None;
        AnalysisEngine::new(&config).unwrap()
    })
}

fn review() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..40).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn prop_tags_are_valid_and_unique(text in review(), rating in 1u8..=5) {
        let engine = engine();
        let result = engine.analyze(&text, rating);

        // Only a review with neither a marker nor a signal comes back untagged
        if !text.trim().is_empty() {
            let prepared = engine.prepare(&text);
            let collected = engine.collect_sentiment_words(&prepared);
            let markers = engine.find_category_markers(&prepared, &collected);
            prop_assert_eq!(
                result.tags.is_empty(),
                markers.is_empty() && collected.is_empty()
            );
        } else {
            prop_assert_eq!(result.tags.len(), 1);
        }

        let mut keys = HashSet::new();
        for tag in &result.tags {
            prop_assert!(tag.category.contains(tag.subcategory));
            prop_assert!(keys.insert(tag.key()));
            prop_assert!(tag.evidence.len() <= 3);
        }

        let specific = result.tags.iter().any(|t| t.category != Category::General);
        let general = result.tags.iter().any(|t| t.category == Category::General);
        prop_assert!(!(specific && general));
        prop_assert!((-1.0..=1.0).contains(&result.sentiment_score));
    }

    #[test]
    fn prop_analysis_is_deterministic(text in review(), rating in 1u8..=5) {
        let first = serde_json::to_string(&engine().analyze(&text, rating)).unwrap();
        let second = serde_json::to_string(&engine().analyze(&text, rating)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_arbitrary_text_never_panics(text in "\\PC{0,300}", rating in 1u8..=5) {
        let result = engine().analyze(&text, rating);
        prop_assert!((-1.0..=1.0).contains(&result.sentiment_score));
        for tag in &result.tags {
            prop_assert!(tag.category.contains(tag.subcategory));
        }
    }

    #[test]
    fn prop_whitespace_is_empty(spaces in "[ \t\n]{0,20}", rating in 1u8..=5) {
        let result = engine().analyze(&spaces, rating);
        prop_assert_eq!(result.tags.len(), 1);
        prop_assert_eq!(result.tags[0].category, Category::General);
    }

    #[test]
    fn prop_ml_fallback_always_answers(text in "\\PC{0,2000}") {
        let classifier = MlSentimentClassifier::new(MlConfig::default());
        let prediction = classifier.predict(&text);
        prop_assert!((0.0..=1.0).contains(&prediction.confidence));
    }
}
