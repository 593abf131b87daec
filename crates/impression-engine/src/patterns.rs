//! Compiled phrase and structural pattern matchers

use crate::lexicon::{PatternKind, PhrasePattern};
use aho_corasick::{AhoCorasick, MatchKind};
use impression_core::{Category, Error, Polarity, Result};
use regex::{Regex, RegexSet};
use std::ops::Range;

/// One pattern or phrase hit in the review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub start: usize,
    pub end: usize,
    pub polarity: Polarity,
    pub description: String,
    pub implies: Option<Category>,
}

/// Literal phrase matcher (Aho-Corasick, leftmost-longest, whole words only)
pub struct PhraseMatcher {
    automaton: Option<AhoCorasick>,
    pattern_labels: Vec<PhrasePattern>,
}

impl PhraseMatcher {
    pub fn new(patterns: impl IntoIterator<Item = PhrasePattern>) -> Result<Self> {
        let pattern_labels: Vec<PhrasePattern> = patterns
            .into_iter()
            .filter(|p| p.kind == PatternKind::Literal && !p.pattern.is_empty())
            .map(|mut p| {
                p.pattern = p.pattern.to_lowercase();
                p
            })
            .collect();

        if pattern_labels.is_empty() {
            return Ok(Self {
                automaton: None,
                pattern_labels,
            });
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(pattern_labels.iter().map(|p| p.pattern.as_str()))
            .map_err(|e| Error::lexicon(format!("Failed to build phrase matcher: {}", e)))?;

        Ok(Self {
            automaton: Some(automaton),
            pattern_labels,
        })
    }

    /// All whole-word phrase occurrences in folded text, in text order
    pub fn find_all(&self, folded: &str) -> Vec<PatternMatch> {
        let Some(automaton) = &self.automaton else {
            return Vec::new();
        };

        automaton
            .find_iter(folded)
            .filter(|m| is_word_bounded(folded, m.start(), m.end()))
            .map(|m| {
                let pattern = &self.pattern_labels[m.pattern().as_usize()];
                PatternMatch {
                    start: m.start(),
                    end: m.end(),
                    polarity: pattern.polarity,
                    description: pattern.description.clone(),
                    implies: pattern.implies,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pattern_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_labels.is_empty()
    }
}

/// Whole-word finder for context markers that carry no polarity
pub struct ContextMatcher {
    automaton: Option<AhoCorasick>,
}

impl ContextMatcher {
    pub fn new(markers: &[String]) -> Result<Self> {
        if markers.is_empty() {
            return Ok(Self { automaton: None });
        }
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(markers.iter().map(|m| m.to_lowercase()))
            .map_err(|e| Error::lexicon(format!("Failed to build context matcher: {}", e)))?;
        Ok(Self {
            automaton: Some(automaton),
        })
    }

    pub fn spans(&self, folded: &str) -> Vec<Range<usize>> {
        let Some(automaton) = &self.automaton else {
            return Vec::new();
        };
        automaton
            .find_iter(folded)
            .filter(|m| is_word_bounded(folded, m.start(), m.end()))
            .map(|m| m.start()..m.end())
            .collect()
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

struct CompiledPattern {
    regex: Regex,
    spec: PhrasePattern,
}

/// Regular-expression patterns, screened through a [`RegexSet`] first
pub struct PatternSet {
    folded: RegexSet,
    folded_patterns: Vec<CompiledPattern>,
    original: RegexSet,
    original_patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    pub fn new(patterns: impl IntoIterator<Item = PhrasePattern>) -> Result<Self> {
        let mut folded_patterns = Vec::new();
        let mut original_patterns = Vec::new();

        for spec in patterns {
            if spec.kind != PatternKind::Regex {
                continue;
            }
            let regex = Regex::new(&spec.pattern).map_err(|e| {
                Error::lexicon(format!("Invalid pattern '{}': {}", spec.description, e))
            })?;
            let compiled = CompiledPattern { regex, spec };
            if compiled.spec.case_sensitive {
                original_patterns.push(compiled);
            } else {
                folded_patterns.push(compiled);
            }
        }

        let build_set = |patterns: &[CompiledPattern]| {
            RegexSet::new(patterns.iter().map(|p| p.regex.as_str()))
                .map_err(|e| Error::lexicon(format!("Failed to build pattern set: {}", e)))
        };

        Ok(Self {
            folded: build_set(&folded_patterns)?,
            original: build_set(&original_patterns)?,
            folded_patterns,
            original_patterns,
        })
    }

    /// All pattern hits, ordered by position then by pattern order.
    ///
    /// Case-insensitive patterns run on `folded`, case-sensitive ones on
    /// `original`; both share the same byte layout.
    pub fn find_all(&self, folded: &str, original: &str) -> Vec<PatternMatch> {
        let mut matches = Vec::new();
        let mut rank = 0usize;

        for (set, patterns, haystack) in [
            (&self.folded, &self.folded_patterns, folded),
            (&self.original, &self.original_patterns, original),
        ] {
            for index in set.matches(haystack).iter() {
                let pattern = &patterns[index];
                for m in pattern.regex.find_iter(haystack) {
                    matches.push((
                        rank + index,
                        PatternMatch {
                            start: m.start(),
                            end: m.end(),
                            polarity: pattern.spec.polarity,
                            description: pattern.spec.description.clone(),
                            implies: pattern.spec.implies,
                        },
                    ));
                }
            }
            rank += patterns.len();
        }

        matches.sort_by_key(|(rank, m)| (m.start, *rank));
        matches.into_iter().map(|(_, m)| m).collect()
    }

    pub fn len(&self) -> usize {
        self.folded_patterns.len() + self.original_patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
