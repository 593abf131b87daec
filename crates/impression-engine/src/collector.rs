//! Sentiment word collection
//!
//! Signals are collected in priority order: structural patterns, literal
//! phrases, negation bigrams, then single words. A token consumed by a
//! higher-priority signal is never counted again.

use crate::lexicon::LexiconStore;
use crate::morphology::suffix_candidates;
use crate::patterns::{ContextMatcher, PatternSet, PhraseMatcher};
use crate::text::{PreparedText, Token};
use impression_core::{CategoryMarker, Polarity, Result, SentimentWord};
use std::ops::Range;

/// Weight of a written-out negation ("not tasty", "not bad")
pub const NEGATION_WEIGHT: u32 = 2;

/// Everything the collector found in one review
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedSentiment {
    /// Signals in text order
    pub words: Vec<SentimentWord>,
    /// Categories implied by structural patterns (staff misconduct → Service)
    pub implicit_markers: Vec<CategoryMarker>,
}

impl CollectedSentiment {
    pub fn positive_surfaces(&self) -> Vec<String> {
        self.surfaces(Polarity::Positive)
    }

    pub fn negative_surfaces(&self) -> Vec<String> {
        self.surfaces(Polarity::Negative)
    }

    /// Weighted totals as `(positive, negative)`
    pub fn weights(&self) -> (u32, u32) {
        weigh(self.words.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn surfaces(&self, polarity: Polarity) -> Vec<String> {
        self.words
            .iter()
            .filter(|w| w.polarity == polarity)
            .map(|w| w.surface.clone())
            .collect()
    }
}

/// Weighted `(positive, negative)` totals of a set of signals
pub fn weigh<'a>(words: impl Iterator<Item = &'a SentimentWord>) -> (u32, u32) {
    words.fold((0, 0), |(pos, neg), w| match w.polarity {
        Polarity::Positive => (pos + w.weight, neg),
        Polarity::Negative => (pos, neg + w.weight),
    })
}

/// Outcome of looking at a negator
enum Negation {
    /// Emit a signal and consume `consumed` tokens after the negator
    Signal(SentimentWord, usize),
    /// Consume tokens without a signal
    Suppress(usize),
    /// Not a negation construction
    None,
}

/// Compiled matchers used to collect sentiment signals
pub struct SentimentCollector {
    patterns: PatternSet,
    phrases: PhraseMatcher,
    comparative: ContextMatcher,
}

impl SentimentCollector {
    pub fn new(lexicon: &LexiconStore) -> Result<Self> {
        let patterns = PatternSet::new(
            lexicon
                .wait_time_patterns
                .iter()
                .chain(&lexicon.personnel_negative_patterns)
                .chain(&lexicon.comfort_negative_patterns)
                .cloned(),
        )?;
        let phrases = PhraseMatcher::new(
            lexicon
                .negative_phrases
                .iter()
                .chain(&lexicon.positive_phrases)
                .cloned(),
        )?;
        let comparative = ContextMatcher::new(&lexicon.comparative_context_markers)?;

        tracing::debug!(
            "Sentiment collector ready ({} patterns, {} phrases)",
            patterns.len(),
            phrases.len()
        );

        Ok(Self {
            patterns,
            phrases,
            comparative,
        })
    }

    pub fn collect(&self, lexicon: &LexiconStore, text: &PreparedText<'_>) -> CollectedSentiment {
        let tokens = &text.tokens;
        let mut claimed = vec![false; tokens.len()];
        let mut collected = CollectedSentiment::default();

        for m in self.patterns.find_all(&text.folded, text.original) {
            if !claim_span(tokens, &mut claimed, m.start, m.end) {
                continue;
            }
            let surface = &text.folded[m.start..m.end];
            if let Some(category) = m.implies {
                collected
                    .implicit_markers
                    .push(CategoryMarker::new(category, surface, m.start));
            }
            collected.words.push(SentimentWord::new(
                surface,
                m.description,
                m.polarity,
                m.start,
            ));
        }

        for m in self.phrases.find_all(&text.folded) {
            if !claim_span(tokens, &mut claimed, m.start, m.end) {
                continue;
            }
            collected.words.push(SentimentWord::new(
                &text.folded[m.start..m.end],
                m.description,
                m.polarity,
                m.start,
            ));
        }

        let comparative_spans = self.comparative.spans(&text.folded);

        let mut i = 0;
        while i < tokens.len() {
            if claimed[i] {
                i += 1;
                continue;
            }

            if lexicon.is_negator(&tokens[i].word) {
                let consumed = match negation(lexicon, text, &claimed, i) {
                    Negation::Signal(word, consumed) => {
                        collected.words.push(word);
                        consumed
                    }
                    Negation::Suppress(consumed) => consumed,
                    Negation::None => 0,
                };
                claimed[i..=i + consumed].iter_mut().for_each(|c| *c = true);
                i += consumed + 1;
                continue;
            }

            claimed[i] = true;
            let token = &tokens[i];
            let lemma = &text.lemmas[i];
            if let Some(polarity) = word_polarity(lexicon, lemma, &token.word) {
                if is_comparative(&token.word, lemma)
                    && in_comparison(text, token.start, &comparative_spans)
                {
                    tracing::trace!("Suppressed comparative '{}'", token.word);
                } else {
                    collected.words.push(SentimentWord::new(
                        token.word.clone(),
                        lemma.clone(),
                        polarity,
                        token.start,
                    ));
                }
            }
            i += 1;
        }

        collected.words.sort_by_key(|w| w.offset);
        collected
    }
}

/// Polarity of a single word from the domain lists, then the general dictionary
pub fn word_polarity(lexicon: &LexiconStore, lemma: &str, surface: &str) -> Option<Polarity> {
    let key = lexicon
        .adverb_to_adjective
        .get(lemma)
        .or_else(|| lexicon.adverb_to_adjective.get(surface))
        .map(String::as_str)
        .unwrap_or(lemma);

    if let Some(polarity) = lexicon.domain_polarity(key) {
        return Some(polarity);
    }
    if lexicon.is_excluded(key) || lexicon.is_excluded(surface) {
        return None;
    }

    let general = lexicon.general();
    if general.is_empty() {
        return None;
    }
    general
        .get(key)
        .or_else(|| general.get(surface))
        .or_else(|| {
            suffix_candidates(surface)
                .iter()
                .find_map(|candidate| general.get(candidate))
        })
}

fn negation(
    lexicon: &LexiconStore,
    text: &PreparedText<'_>,
    claimed: &[bool],
    negator: usize,
) -> Negation {
    let tokens = &text.tokens;
    let available = |index: usize| index < tokens.len() && !claimed[index];

    let mut target = negator + 1;
    if !available(target) {
        return Negation::None;
    }
    let qualified = lexicon.is_degree_qualifier(&tokens[target].word);
    if qualified {
        target += 1;
        if !available(target) {
            return Negation::None;
        }
    }

    let segmentation = &text.segmentation;
    if segmentation.phrase_at(tokens[negator].start) != segmentation.phrase_at(tokens[target].start)
    {
        return Negation::None;
    }

    let lemma = &text.lemmas[target];
    let surface = &tokens[target].word;
    let consumed = target - negator;
    let bigram = || span_text(text, &tokens[negator], &tokens[target]);

    let litotes = lexicon.litotes_words.contains(lemma) || lexicon.litotes_words.contains(surface);
    let polarity = word_polarity(lexicon, lemma, surface);
    let negatable = lexicon.negatable_words.contains(lemma);

    if qualified {
        // "not very friendly" and "not very bad" are weaker than a negation
        // in either direction; drop them entirely
        return if litotes || negatable || polarity.is_some() {
            Negation::Suppress(consumed)
        } else {
            Negation::None
        };
    }

    if litotes {
        let word = SentimentWord::new(
            bigram(),
            lemma.clone(),
            Polarity::Positive,
            tokens[negator].start,
        )
        .with_weight(NEGATION_WEIGHT);
        return Negation::Signal(word, consumed);
    }

    match polarity {
        Some(Polarity::Positive) => {}
        Some(Polarity::Negative) => return Negation::Suppress(consumed),
        None if negatable => {}
        None => return Negation::None,
    }

    let word = SentimentWord::new(
        bigram(),
        lemma.clone(),
        Polarity::Negative,
        tokens[negator].start,
    )
    .with_weight(NEGATION_WEIGHT);
    Negation::Signal(word, consumed)
}

fn span_text(text: &PreparedText<'_>, first: &Token, last: &Token) -> String {
    text.folded[first.start..last.end].replace('’', "'")
}

/// Claim every token overlapping `start..end`; fails if any is already claimed
fn claim_span(tokens: &[Token], claimed: &mut [bool], start: usize, end: usize) -> bool {
    let overlapping: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.start < end && t.end > start)
        .map(|(i, _)| i)
        .collect();

    if overlapping.iter().any(|&i| claimed[i]) {
        return false;
    }
    for i in overlapping {
        claimed[i] = true;
    }
    true
}

fn is_comparative(surface: &str, lemma: &str) -> bool {
    matches!(surface, "better" | "worse")
        || (surface.ends_with("er") && lemma != surface && surface.len() > lemma.len())
}

fn in_comparison(text: &PreparedText<'_>, offset: usize, spans: &[Range<usize>]) -> bool {
    let sentence = text.segmentation.sentence_at(offset);
    spans
        .iter()
        .any(|span| span.start >= sentence.start && span.end <= sentence.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::GeneralLexicon;
    use crate::morphology::MorphologicalNormalizer;
    use crate::text::Segmenter;

    struct Fixture {
        lexicon: LexiconStore,
        collector: SentimentCollector,
        segmenter: Segmenter,
        morphology: MorphologicalNormalizer,
    }

    impl Fixture {
        fn new() -> Self {
            let lexicon = LexiconStore::horeca().with_general_lexicon(GeneralLexicon::from_entries(
                vec![
                    ("adorable".to_string(), Polarity::Positive),
                    ("dreadful".to_string(), Polarity::Negative),
                    ("sweet".to_string(), Polarity::Positive),
                ],
            ));
            let collector = SentimentCollector::new(&lexicon).unwrap();
            let morphology = MorphologicalNormalizer::new(lexicon.vocabulary().cloned());
            Self {
                lexicon,
                collector,
                segmenter: Segmenter::new().unwrap(),
                morphology,
            }
        }

        fn collect(&self, text: &str) -> CollectedSentiment {
            let prepared = PreparedText::new(text, &self.segmenter, &self.morphology);
            self.collector.collect(&self.lexicon, &prepared)
        }
    }

    #[test]
    fn test_negated_positive_is_negative() {
        let collected = Fixture::new().collect("The soup was not tasty");
        assert_eq!(collected.words.len(), 1);
        assert_eq!(collected.words[0].surface, "not tasty");
        assert_eq!(collected.words[0].polarity, Polarity::Negative);
        assert_eq!(collected.weights(), (0, 2));
    }

    #[test]
    fn test_litotes() {
        let fixture = Fixture::new();
        for text in ["not bad", "Not too bad at all", "no problems"] {
            let collected = fixture.collect(text);
            assert_eq!(collected.words[0].polarity, Polarity::Positive, "{}", text);
            assert_eq!(collected.negative_surfaces(), Vec::<String>::new(), "{}", text);
        }
    }

    #[test]
    fn test_qualified_negation_suppresses_positive() {
        let collected = Fixture::new().collect("the staff was not very friendly");
        assert!(collected.is_empty());
    }

    #[test]
    fn test_qualified_negation_suppresses_negative() {
        let fixture = Fixture::new();
        for text in ["the food was not very bad", "the hall was not too dirty"] {
            let collected = fixture.collect(text);
            assert!(collected.is_empty(), "{}", text);
        }
    }

    #[test]
    fn test_negated_negatable_word() {
        let collected = Fixture::new().collect("The waiter didn't apologize, we won't return");
        let negatives = collected.negative_surfaces();
        assert!(negatives.iter().any(|s| s.contains("apologize")));
        assert!(negatives.contains(&"won't return".to_string()));
    }

    #[test]
    fn test_phrase_claims_tokens() {
        let collected = Fixture::new().collect("Highly recommend, never again though");
        assert_eq!(collected.positive_surfaces(), vec!["highly recommend"]);
        assert_eq!(collected.negative_surfaces(), vec!["never again"]);
    }

    #[test]
    fn test_wait_pattern_and_implied_service() {
        let collected = Fixture::new().collect("We waited an hour. The waitress ignored us.");
        assert!(collected.words.iter().any(|w| w.lemma == "long wait"));
        assert_eq!(collected.implicit_markers.len(), 1);
        // "ignored" is consumed by the personnel pattern, not counted twice
        assert_eq!(collected.weights(), (0, 2));
    }

    #[test]
    fn test_general_lexicon_and_exclusions() {
        let collected = Fixture::new().collect("An adorable, sweet, dreadful spot");
        assert_eq!(collected.positive_surfaces(), vec!["adorable"]);
        assert_eq!(collected.negative_surfaces(), vec!["dreadful"]);
    }

    #[test]
    fn test_adverbs_map_to_adjectives() {
        let collected = Fixture::new().collect("served quickly and rudely");
        assert_eq!(collected.positive_surfaces(), vec!["quickly"]);
        assert_eq!(collected.negative_surfaces(), vec!["rudely"]);
    }

    #[test]
    fn test_comparatives_suppressed_in_comparison() {
        let fixture = Fixture::new();
        let collected = fixture.collect("Coffee is better elsewhere.");
        assert!(collected.is_empty());

        let collected = fixture.collect("Coffee is better elsewhere. It was tasty though.");
        assert_eq!(collected.positive_surfaces(), vec!["tasty"]);

        let collected = fixture.collect("The coffee got better.");
        assert_eq!(collected.positive_surfaces(), vec!["better"]);
    }

    #[test]
    fn test_words_sorted_by_offset() {
        let collected = Fixture::new().collect("rude waiter, never again, tasty pizza");
        let offsets: Vec<_> = collected.words.iter().map(|w| w.offset).collect();
        let mut sorted = offsets.clone();
        sorted.sort();
        assert_eq!(offsets, sorted);
    }
}
