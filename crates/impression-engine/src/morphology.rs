//! Morphological normalization
//!
//! Reduces an inflected word to its dictionary lemma so that "waited",
//! "waiting" and "waits" all hit the same lexicon entry. Resolution runs
//! in this order:
//!
//! 1. irregular forms table
//! 2. the word itself, when it is a known lemma
//! 3. suffix stripping, keeping only candidates that are known lemmas
//! 4. Snowball stem lookup against the stems of known lemmas
//! 5. the word unchanged
//!
//! Results are memoized in a bounded table shared by all callers.

use parking_lot::RwLock;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Default bound of the memo table
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Word → lemma reduction
pub trait Lemmatizer: Send + Sync {
    /// Return the lemma of a lowercase word; unknown words come back unchanged
    fn lemma(&self, word: &str) -> String;
}

const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("did", "do"),
    ("does", "do"),
    ("done", "do"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("forgot", "forget"),
    ("forgotten", "forget"),
    ("paid", "pay"),
    ("ate", "eat"),
    ("eaten", "eat"),
    ("took", "take"),
    ("taken", "take"),
    ("came", "come"),
    ("went", "go"),
    ("gone", "go"),
    ("left", "leave"),
    ("brought", "bring"),
    ("felt", "feel"),
    ("gave", "give"),
    ("given", "give"),
    ("got", "get"),
    ("gotten", "get"),
    ("made", "make"),
    ("said", "say"),
    ("told", "tell"),
    ("sat", "sit"),
    ("kept", "keep"),
    ("spent", "spend"),
    ("sent", "send"),
    ("bought", "buy"),
    ("thought", "think"),
    ("found", "find"),
    ("saw", "see"),
    ("seen", "see"),
    ("drank", "drink"),
    ("drunk", "drink"),
    ("froze", "freeze"),
    ("frozen", "freeze"),
    ("burnt", "burn"),
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("teeth", "tooth"),
    ("knives", "knife"),
    ("loaves", "loaf"),
];

/// Participles that name a way of cooking; "smoked salmon" is not smoke
const CULINARY_PARTICIPLES: &[&str] = &[
    "smoked", "grilled", "roasted", "baked", "steamed", "poached", "toasted", "stuffed",
    "pickled", "cured", "braised", "stewed",
];

/// Rule-based English analyzer over a closed vocabulary of lemmas
struct EnglishAnalyzer {
    irregular: HashMap<&'static str, &'static str>,
    stemmer: Stemmer,
    /// Snowball stem → known lemma
    stem_index: HashMap<String, String>,
}

impl EnglishAnalyzer {
    fn new(vocabulary: &HashSet<String>) -> Self {
        let stemmer = Stemmer::create(Algorithm::English);

        let mut stem_index: HashMap<String, String> = HashMap::new();
        for lemma in vocabulary {
            // Multi-word entries never reach the word-level analyzer
            if lemma.contains(' ') {
                continue;
            }
            let stem = stemmer.stem(lemma).into_owned();
            match stem_index.get(&stem) {
                Some(existing)
                    if (existing.len(), existing.as_str()) <= (lemma.len(), lemma.as_str()) => {}
                _ => {
                    stem_index.insert(stem, lemma.clone());
                }
            }
        }

        Self {
            irregular: IRREGULAR_FORMS.iter().copied().collect(),
            stemmer,
            stem_index,
        }
    }

    fn analyze(&self, word: &str, vocabulary: &HashSet<String>) -> Option<String> {
        if let Some(lemma) = self.irregular.get(word) {
            return Some((*lemma).to_string());
        }
        if CULINARY_PARTICIPLES.contains(&word) {
            return Some(word.to_string());
        }
        if vocabulary.contains(word) {
            return Some(word.to_string());
        }
        if let Some(lemma) = suffix_candidates(word)
            .into_iter()
            .find(|candidate| vocabulary.contains(candidate))
        {
            return Some(lemma);
        }
        // A lemma longer than the word is a derivation ("friends" and
        // "friendly" share a stem), not an inflection
        self.stem_index
            .get(self.stemmer.stem(word).as_ref())
            .filter(|lemma| lemma.len() <= word.len())
            .cloned()
    }
}

/// Candidate base forms produced by stripping English inflection suffixes
pub fn suffix_candidates(word: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    if word.len() < 4 || !word.is_ascii() {
        return candidates;
    }

    // -ies / -ied / -ier / -iest → -y
    for suffix in ["ies", "ied", "ier", "iest"] {
        if let Some(base) = word.strip_suffix(suffix) {
            candidates.push(format!("{}y", base));
        }
    }

    for suffix in ["ing", "ed", "er", "est", "es", "s"] {
        let Some(base) = word.strip_suffix(suffix) else {
            continue;
        };
        if base.len() < 2 {
            continue;
        }
        candidates.push(base.to_string());
        if matches!(suffix, "ing" | "ed" | "er" | "est") {
            candidates.push(format!("{}e", base));
            if let Some(undoubled) = undouble(base) {
                candidates.push(undoubled);
            }
        } else if suffix == "s" {
            break;
        }
    }

    candidates
}

fn undouble(base: &str) -> Option<String> {
    let bytes = base.as_bytes();
    let n = bytes.len();
    if n >= 3 && bytes[n - 1] == bytes[n - 2] && !b"aeiou".contains(&bytes[n - 1]) {
        Some(base[..n - 1].to_string())
    } else {
        None
    }
}

/// Memoizing normalizer over a domain vocabulary.
///
/// The analyzer (and its stem index) is built on first use.
pub struct MorphologicalNormalizer {
    vocabulary: HashSet<String>,
    analyzer: OnceLock<EnglishAnalyzer>,
    cache: RwLock<HashMap<String, String>>,
    capacity: usize,
}

impl MorphologicalNormalizer {
    pub fn new(vocabulary: impl IntoIterator<Item = String>) -> Self {
        Self::with_capacity(vocabulary, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(vocabulary: impl IntoIterator<Item = String>, capacity: usize) -> Self {
        Self {
            vocabulary: vocabulary.into_iter().collect(),
            analyzer: OnceLock::new(),
            cache: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Number of memoized words
    pub fn cached_entries(&self) -> usize {
        self.cache.read().len()
    }

    fn analyzer(&self) -> &EnglishAnalyzer {
        self.analyzer.get_or_init(|| {
            let analyzer = EnglishAnalyzer::new(&self.vocabulary);
            tracing::debug!(
                "Morphology analyzer ready ({} lemmas, {} stems)",
                self.vocabulary.len(),
                analyzer.stem_index.len()
            );
            analyzer
        })
    }
}

impl Lemmatizer for MorphologicalNormalizer {
    fn lemma(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        if let Some(lemma) = self.cache.read().get(word) {
            return lemma.clone();
        }

        let lemma = self
            .analyzer()
            .analyze(word, &self.vocabulary)
            .unwrap_or_else(|| word.to_string());

        let mut cache = self.cache.write();
        if cache.len() < self.capacity {
            cache.insert(word.to_string(), lemma.clone());
        }
        lemma
    }
}
