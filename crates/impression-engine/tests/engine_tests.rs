//! End-to-end behaviour of the lexicon pipeline

use impression_engine::{AnalysisEngine, EngineConfig};
use impression_core::{AnalysisResult, Category, ImpressionTag, Sentiment, Subcategory};
use std::collections::HashSet;
use std::path::PathBuf;

fn engine() -> AnalysisEngine {
    let mut config = EngineConfig::default();
    config.lexicon.general_lexicon_path = Some(PathBuf::from(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../data/general_lexicon.txt"
    )));
    AnalysisEngine::new(&config).unwrap()
}

fn find(result: &AnalysisResult, subcategory: Subcategory) -> Option<&ImpressionTag> {
    result.tags.iter().find(|t| t.subcategory == subcategory)
}

fn has_sentiment(result: &AnalysisResult, sentiment: Sentiment) -> bool {
    result.tags.iter().any(|t| t.sentiment == sentiment)
}

#[test]
fn test_empty_text_uses_rating_only() {
    let engine = engine();
    let cases = [
        (1, Sentiment::Negative, -1.0),
        (2, Sentiment::Negative, -1.0),
        (3, Sentiment::Neutral, 0.0),
        (4, Sentiment::Positive, 1.0),
        (5, Sentiment::Positive, 1.0),
    ];

    for text in ["", "   ", "\n\t "] {
        for (rating, sentiment, score) in cases {
            let result = engine.analyze(text, rating);
            assert_eq!(result.tags.len(), 1);
            let tag = &result.tags[0];
            assert_eq!(tag.category, Category::General);
            assert_eq!(tag.subcategory, Subcategory::GeneralImpression);
            assert_eq!(tag.sentiment, sentiment);
            assert_eq!(result.sentiment_score, score);
        }
    }
}

#[test]
fn test_negation_inverts_positive_word() {
    let result = engine().analyze("not tasty", 3);
    assert!(has_sentiment(&result, Sentiment::Negative));

    let tag = find(&result, Subcategory::FoodCuisine).unwrap();
    assert_eq!(tag.sentiment, Sentiment::Negative);
    assert_eq!(tag.evidence, vec!["not tasty"]);
    assert_eq!(result.sentiment_score, -1.0);
}

#[test]
fn test_litotes_is_positive() {
    let result = engine().analyze("not bad", 3);
    assert!(has_sentiment(&result, Sentiment::Positive));
    assert_eq!(result.tags.len(), 1);
    assert_eq!(result.tags[0].category, Category::General);
    assert_eq!(result.tags[0].marker, "-");
    assert_eq!(result.sentiment_score, 1.0);
}

#[test]
fn test_clauses_do_not_blend() {
    let result = engine().analyze("food was great, but the waiter was rude", 3);

    let product = result
        .tags
        .iter()
        .find(|t| t.category == Category::Product)
        .unwrap();
    assert_eq!(product.sentiment, Sentiment::Positive);
    assert_eq!(product.evidence, vec!["great"]);

    let service = result
        .tags
        .iter()
        .find(|t| t.category == Category::Service)
        .unwrap();
    assert_eq!(service.sentiment, Sentiment::Negative);
    assert_eq!(service.subcategory, Subcategory::Rudeness);

    assert_eq!(result.sentiment_score, 0.0);
}

#[test]
fn test_contrast_without_comma() {
    let result = engine().analyze("The food was great but the waiter was rude", 3);
    assert_eq!(
        find(&result, Subcategory::FoodCuisine).map(|t| t.sentiment),
        Some(Sentiment::Positive)
    );
    assert_eq!(
        find(&result, Subcategory::Rudeness).map(|t| t.sentiment),
        Some(Sentiment::Negative)
    );
}

#[test]
fn test_wait_pattern_tags_waiting() {
    let result = engine().analyze("We waited an hour for our pizza", 2);
    let waiting = find(&result, Subcategory::Waiting).unwrap();
    assert_eq!(waiting.category, Category::Speed);
    assert_eq!(waiting.sentiment, Sentiment::Negative);
    assert_eq!(waiting.evidence, vec!["waited an hour"]);
}

#[test]
fn test_emphatic_wait() {
    let result = engine().analyze("We waited HOURS", 2);
    assert_eq!(
        find(&result, Subcategory::Waiting).map(|t| t.sentiment),
        Some(Sentiment::Negative)
    );

    let calm = engine().analyze("We waited hours", 2);
    assert!(!has_sentiment(&calm, Sentiment::Negative));
}

#[test]
fn test_personnel_pattern() {
    let result = engine().analyze("The waiter forgot our order", 2);
    let attention = find(&result, Subcategory::Attention).unwrap();
    assert_eq!(attention.category, Category::Service);
    assert_eq!(attention.sentiment, Sentiment::Negative);
    assert_eq!(attention.marker, "waiter");
}

#[test]
fn test_implicit_service_marker() {
    let result = engine().analyze("Nobody came for twenty minutes", 1);
    assert!(result
        .tags
        .iter()
        .any(|t| t.category == Category::Service && t.sentiment == Sentiment::Negative));
}

#[test]
fn test_comparative_suppressed_near_other_venues() {
    let result = engine().analyze("The coffee is better in other places", 3);
    assert!(!has_sentiment(&result, Sentiment::Positive));
    assert_eq!(
        find(&result, Subcategory::DrinksBar).map(|t| t.sentiment),
        Some(Sentiment::Neutral)
    );
    assert_eq!(result.sentiment_score, 0.0);
}

#[test]
fn test_qualified_negation_is_dropped() {
    let result = engine().analyze("The staff was not very friendly", 3);
    let politeness = find(&result, Subcategory::Politeness).unwrap();
    assert_eq!(politeness.sentiment, Sentiment::Neutral);
    assert!(politeness.evidence.is_empty());
}

#[test]
fn test_qualified_negation_of_negative_word_is_dropped() {
    let result = engine().analyze("The pizza was not very bad", 3);
    assert!(!has_sentiment(&result, Sentiment::Negative));
    assert!(!has_sentiment(&result, Sentiment::Positive));
    assert_eq!(result.sentiment_score, 0.0);
}

#[test]
fn test_derived_lemma_carries_no_sentiment() {
    let engine = engine();
    for text in ["We came here with friends", "Came with a friend"] {
        let result = engine.analyze(text, 3);
        assert!(!has_sentiment(&result, Sentiment::Positive), "{}", text);
        assert_eq!(result.sentiment_score, 0.0);
    }
}

#[test]
fn test_smoked_food_is_not_a_smoke_complaint() {
    let result = engine().analyze("The smoked salmon was delicious", 5);
    assert!(result.tags.iter().all(|t| t.category != Category::Comfort));
    assert_eq!(
        find(&result, Subcategory::FoodCuisine).map(|t| t.sentiment),
        Some(Sentiment::Positive)
    );
    assert_eq!(result.sentiment_score, 1.0);
}

#[test]
fn test_smoke_complaint_is_negative_comfort() {
    let result = engine().analyze("The hall smelled of cigarette smoke", 2);
    assert_eq!(
        find(&result, Subcategory::InteriorAtmosphere).map(|t| t.sentiment),
        Some(Sentiment::Negative)
    );
    assert!(result.sentiment_score < 0.0);
}

#[test]
fn test_positive_phrase() {
    let result = engine().analyze("No complaints about the pizza", 5);
    assert_eq!(
        find(&result, Subcategory::FoodCuisine).map(|t| t.sentiment),
        Some(Sentiment::Positive)
    );
}

#[test]
fn test_general_fallback_without_markers() {
    let result = engine().analyze("Absolutely wonderful!", 5);
    assert_eq!(result.tags.len(), 1);
    assert_eq!(result.tags[0].subcategory, Subcategory::GeneralImpression);
    assert_eq!(result.tags[0].sentiment, Sentiment::Positive);
    assert_eq!(result.tags[0].evidence, vec!["wonderful"]);
    assert_eq!(result.sentiment_score, 1.0);
}

#[test]
fn test_general_dropped_when_specific_present() {
    let result = engine().analyze("Great place, the soup was delicious", 5);
    assert!(result.tags.iter().all(|t| t.category != Category::General));
    assert_eq!(
        find(&result, Subcategory::FoodCuisine).map(|t| t.sentiment),
        Some(Sentiment::Positive)
    );
}

#[test]
fn test_general_lexicon_words_count() {
    // "dreadful" and "scrumptious" are only known to the general dictionary
    let result = engine().analyze("The dessert was scrumptious, the music dreadful", 4);
    assert_eq!(
        find(&result, Subcategory::FoodCuisine).map(|t| t.sentiment),
        Some(Sentiment::Positive)
    );
    assert_eq!(
        find(&result, Subcategory::InteriorAtmosphere).map(|t| t.sentiment),
        Some(Sentiment::Negative)
    );
}

#[test]
fn test_no_signal_scores_by_rating() {
    let engine = engine();
    assert_eq!(engine.analyze("We had lunch here", 5).sentiment_score, 1.0);
    assert_eq!(engine.analyze("We had lunch here", 1).sentiment_score, -1.0);
    assert!(!engine.analyze("We had lunch here", 5).tags.is_empty());
}

#[test]
fn test_no_marker_no_signal_has_no_tags() {
    let engine = engine();
    for (rating, score) in [(1, -1.0), (2, -1.0), (3, 0.0), (4, 1.0), (5, 1.0)] {
        let result = engine.analyze("the", rating);
        assert!(result.tags.is_empty());
        assert_eq!(result.sentiment_score, score);
    }
}

#[test]
fn test_weighted_ratio_score() {
    // "not friendly" counts double against one positive word
    let result = engine().analyze("Tasty soup. The waitress was not friendly.", 3);
    assert_eq!(result.sentiment_score, -0.33);
}

#[test]
fn test_sample_corpus_invariants() {
    let engine = engine();
    let corpus = [
        "Amazing pizza and friendly staff, will come back!",
        "The soup was cold and the bill was wrong. Never again.",
        "Cozy interior, but the music was too loud and the toilet was dirty.",
        "Waited forever for a table even though we had a reservation",
        "Prices are reasonable, portions are huge",
        "The manager was rude and refused to apologize",
        "Delivery took over an hour and the fries were soggy",
        "Not worth the money. Overpriced drinks.",
        "Everything was perfect, thank you!",
        "The waiter ignored us and the coffee tasted burnt",
        "Hardly any parking near the entrance",
        "Nice atmosphere, quick service, delicious desserts.",
    ];

    for text in corpus {
        for rating in 1..=5 {
            let result = engine.analyze(text, rating);
            assert!(!result.tags.is_empty(), "{}", text);

            let mut keys = HashSet::new();
            for tag in &result.tags {
                assert!(tag.category.contains(tag.subcategory), "{:?}", tag);
                assert!(keys.insert(tag.key()), "duplicate tag in '{}'", text);
                assert!(tag.evidence.len() <= 3);
            }
            if result.tags.iter().any(|t| t.category != Category::General) {
                assert!(result.tags.iter().all(|t| t.category != Category::General));
            }
            assert!((-1.0..=1.0).contains(&result.sentiment_score));
            assert_eq!(result, engine.analyze(text, rating));
        }
    }
}

#[test]
fn test_result_serializes_to_persisted_shape() {
    let result = engine().analyze("food was great, but the waiter was rude", 3);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["tags"][0]["category"], "Product");
    assert_eq!(json["tags"][0]["subcategory"], "Food/cuisine");
    assert!(json["sentiment_score"].is_number());

    let back: AnalysisResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}
