//! The analysis engine: owned lexicons, compiled matchers and the lemmatizer

use crate::collector::{CollectedSentiment, SentimentCollector};
use crate::config::EngineConfig;
use crate::lexicon::LexiconStore;
use crate::markers::CategoryLexicon;
use crate::morphology::{Lemmatizer, MorphologicalNormalizer};
use crate::scoring::ScoringStrategy;
use crate::tags::{build_tags, empty_text_tag};
use crate::text::{PreparedText, Segmenter};
use impression_core::{AnalysisResult, CategoryMarker, ImpressionTag, Result, Sentiment};
use std::sync::Arc;

/// Lexicon pass over one non-empty review
#[derive(Debug, Clone)]
pub struct LexiconAnalysis {
    pub tags: Vec<ImpressionTag>,
    pub sentiment: CollectedSentiment,
}

impl LexiconAnalysis {
    /// Weighted `(positive, negative)` signal totals
    pub fn weights(&self) -> (u32, u32) {
        self.sentiment.weights()
    }
}

/// Immutable analysis state, built once and shared across threads.
///
/// Every method is a pure function of its input and the lexicons held here.
pub struct AnalysisEngine {
    lexicon: LexiconStore,
    categories: CategoryLexicon,
    segmenter: Segmenter,
    collector: SentimentCollector,
    morphology: Arc<dyn Lemmatizer>,
}

impl AnalysisEngine {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let mut lexicon = LexiconStore::horeca();
        if let Some(path) = &config.lexicon.general_lexicon_path {
            lexicon = lexicon.with_general_lexicon_path(path.clone());
        }
        let categories = CategoryLexicon::horeca();
        let morphology = normalizer_for(&lexicon, &categories, config.morphology.cache_capacity);

        Self::with_lexicons(lexicon, categories, morphology)
    }

    /// Built-in lexicons with default configuration
    pub fn horeca() -> Result<Self> {
        Self::new(&EngineConfig::default())
    }

    /// Engine over substitute lexicons and lemmatizer
    pub fn with_lexicons(
        lexicon: LexiconStore,
        categories: CategoryLexicon,
        morphology: Arc<dyn Lemmatizer>,
    ) -> Result<Self> {
        let segmenter = Segmenter::new()?;
        let collector = SentimentCollector::new(&lexicon)?;

        tracing::info!("✓ Analysis engine initialized");

        Ok(Self {
            lexicon,
            categories,
            segmenter,
            collector,
            morphology,
        })
    }

    pub fn lexicon(&self) -> &LexiconStore {
        &self.lexicon
    }

    pub fn categories(&self) -> &CategoryLexicon {
        &self.categories
    }

    pub fn lemma(&self, word: &str) -> String {
        self.morphology.lemma(word)
    }

    /// Fold, tokenize, lemmatize and segment a review
    pub fn prepare<'a>(&self, text: &'a str) -> PreparedText<'a> {
        PreparedText::new(text, &self.segmenter, self.morphology.as_ref())
    }

    pub fn collect_sentiment_words(&self, text: &PreparedText<'_>) -> CollectedSentiment {
        self.collector.collect(&self.lexicon, text)
    }

    /// Category markers at every occurrence, plus markers implied by patterns
    pub fn find_category_markers(
        &self,
        text: &PreparedText<'_>,
        collected: &CollectedSentiment,
    ) -> Vec<CategoryMarker> {
        let mut markers = self.categories.find_markers(
            text.tokens
                .iter()
                .zip(&text.lemmas)
                .map(|(token, lemma)| (lemma.as_str(), token.word.as_str(), token.start)),
        );
        markers.extend(collected.implicit_markers.iter().cloned());
        markers.sort_by_key(|m| m.offset);
        markers
    }

    /// Tags and collected signals for a non-empty review
    pub fn find_tags(&self, text: &str) -> LexiconAnalysis {
        metrics::counter!("impression_analyses_total", "path" => "text").increment(1);

        let prepared = self.prepare(text);
        let sentiment = self.collect_sentiment_words(&prepared);
        let markers = self.find_category_markers(&prepared, &sentiment);
        let tags = build_tags(&markers, &sentiment, &prepared, &self.categories);

        tracing::trace!(
            "{} markers, {} signals, {} tags",
            markers.len(),
            sentiment.words.len(),
            tags.len()
        );

        LexiconAnalysis { tags, sentiment }
    }

    /// The fixed result for an empty or whitespace-only review
    pub fn empty_result(&self, rating: u8) -> AnalysisResult {
        metrics::counter!("impression_analyses_total", "path" => "empty").increment(1);
        AnalysisResult::new(
            vec![empty_text_tag(rating)],
            Sentiment::from_rating(rating).unit_score(),
        )
    }

    /// Lexicon-only analysis, scored by word-count ratio
    pub fn analyze(&self, text: &str, rating: u8) -> AnalysisResult {
        if is_blank(text) {
            return self.empty_result(rating);
        }
        let analysis = self.find_tags(text);
        let score = ScoringStrategy::LexiconRatio.score(analysis.weights(), rating, None);
        AnalysisResult::new(analysis.tags, score)
    }
}

pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn normalizer_for(
    lexicon: &LexiconStore,
    categories: &CategoryLexicon,
    capacity: usize,
) -> Arc<dyn Lemmatizer> {
    let vocabulary = lexicon
        .vocabulary()
        .chain(categories.vocabulary())
        .cloned();
    Arc::new(MorphologicalNormalizer::with_capacity(vocabulary, capacity))
}
