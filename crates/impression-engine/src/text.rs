//! Text preparation: case folding, tokenization and scope windows
//!
//! All offsets produced here are byte offsets. [`fold_case`] keeps the byte
//! layout of its input, so an offset taken from the folded text is also a
//! valid offset into the original review.

use crate::morphology::Lemmatizer;
use impression_core::{Error, Result};
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

/// Lowercase `text` without changing its byte layout.
///
/// Characters whose lowercase form has a different UTF-8 length (or expands
/// to several characters) are left as they are.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) if l.len_utf8() == c.len_utf8() => l,
                _ => c,
            }
        })
        .collect()
}

/// A word of the review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Word with typographic apostrophes normalized to `'`
    pub word: String,
    pub start: usize,
    pub end: usize,
}

/// Compiled tokenizer and boundary expressions
#[derive(Debug, Clone)]
pub struct Segmenter {
    word: Regex,
    phrase_boundary: Regex,
    sentence_boundary: Regex,
}

impl Segmenter {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| Error::lexicon(format!("Invalid segmentation regex: {}", e)))
        };

        Ok(Self {
            word: compile(r"\p{L}+(?:['’]\p{L}+)*")?,
            phrase_boundary: compile(r"[,;:.!?\n]+|\b(?:but|however|although|though|whereas)\b")?,
            sentence_boundary: compile(r"[.!?\n]+")?,
        })
    }

    /// Split folded text into word tokens
    pub fn tokenize(&self, folded: &str) -> Vec<Token> {
        self.word
            .find_iter(folded)
            .map(|m| Token {
                word: m.as_str().replace('’', "'"),
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }

    pub fn segment(&self, folded: &str) -> Segmentation {
        Segmentation {
            len: folded.len(),
            phrases: split_ranges(folded, &self.phrase_boundary),
            sentences: split_ranges(folded, &self.sentence_boundary),
        }
    }
}

/// A review prepared for analysis: folded, tokenized, lemmatized and segmented
pub struct PreparedText<'a> {
    pub original: &'a str,
    pub folded: String,
    pub tokens: Vec<Token>,
    /// Lemma of each token, parallel to `tokens`
    pub lemmas: Vec<String>,
    pub segmentation: Segmentation,
}

impl<'a> PreparedText<'a> {
    pub fn new(original: &'a str, segmenter: &Segmenter, lemmatizer: &dyn Lemmatizer) -> Self {
        let folded = fold_case(original);
        let tokens = segmenter.tokenize(&folded);
        let lemmas = tokens.iter().map(|t| lemmatizer.lemma(&t.word)).collect();
        let segmentation = segmenter.segment(&folded);
        Self {
            original,
            folded,
            tokens,
            lemmas,
            segmentation,
        }
    }

    /// Lemmas of the tokens starting inside `range`
    pub fn lemmas_within(&self, range: &Range<usize>) -> HashSet<String> {
        self.tokens
            .iter()
            .zip(&self.lemmas)
            .filter(|(token, _)| range.contains(&token.start))
            .map(|(_, lemma)| lemma.clone())
            .collect()
    }
}

/// Phrase and sentence boundaries of one review
#[derive(Debug, Clone)]
pub struct Segmentation {
    len: usize,
    phrases: Vec<Range<usize>>,
    sentences: Vec<Range<usize>>,
}

impl Segmentation {
    /// Phrase (delimited by punctuation or a contrast conjunction) holding `offset`
    pub fn phrase_at(&self, offset: usize) -> Range<usize> {
        self.phrases
            .iter()
            .find(|r| r.contains(&offset))
            .cloned()
            .unwrap_or(0..self.len)
    }

    /// Sentence holding `offset`
    pub fn sentence_at(&self, offset: usize) -> Range<usize> {
        match self.sentence_index(offset) {
            Some(i) => self.sentences[i].clone(),
            None => 0..self.len,
        }
    }

    /// Sentence holding `offset` together with its neighbours on both sides
    pub fn neighbourhood(&self, offset: usize) -> Range<usize> {
        match self.sentence_index(offset) {
            Some(i) => {
                let first = i.saturating_sub(1);
                let last = (i + 1).min(self.sentences.len() - 1);
                self.sentences[first].start..self.sentences[last].end
            }
            None => 0..self.len,
        }
    }

    /// The three scope levels around `offset`, narrowest first
    pub fn windows(&self, offset: usize) -> [Range<usize>; 3] {
        [
            self.phrase_at(offset),
            self.sentence_at(offset),
            self.neighbourhood(offset),
        ]
    }

    fn sentence_index(&self, offset: usize) -> Option<usize> {
        self.sentences.iter().position(|r| r.contains(&offset))
    }
}

fn split_ranges(text: &str, boundary: &Regex) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(text) {
        if m.start() > start {
            ranges.push(start..m.start());
        }
        start = m.end();
    }
    if start < text.len() {
        ranges.push(start..text.len());
    }
    ranges
}
