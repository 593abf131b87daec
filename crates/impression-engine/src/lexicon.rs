//! Sentiment lexicons for the hospitality domain
//!
//! [`LexiconStore`] bundles the hand-tuned domain word lists, the phrase and
//! structural patterns, and the large general-purpose sentiment dictionary.
//! All of it is read-only after construction; the general dictionary is read
//! from disk on first use.

use impression_core::{Category, Error, Polarity, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// How a [`PhrasePattern`] is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Exact phrase, matched on word boundaries
    Literal,
    /// Regular expression
    Regex,
}

/// A multi-word or structural sentiment signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhrasePattern {
    pub kind: PatternKind,
    pub pattern: String,
    pub polarity: Polarity,
    /// Stored as the lemma of the produced sentiment word
    pub description: String,
    /// Category implied by a match (staff misconduct implies Service)
    #[serde(default)]
    pub implies: Option<Category>,
    /// Match against the original text instead of the case-folded one
    #[serde(default)]
    pub case_sensitive: bool,
}

impl PhrasePattern {
    pub fn literal(phrase: impl Into<String>, polarity: Polarity) -> Self {
        let phrase = phrase.into();
        Self {
            kind: PatternKind::Literal,
            description: phrase.clone(),
            pattern: phrase,
            polarity,
            implies: None,
            case_sensitive: false,
        }
    }

    pub fn regex(
        pattern: impl Into<String>,
        polarity: Polarity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: PatternKind::Regex,
            pattern: pattern.into(),
            polarity,
            description: description.into(),
            implies: None,
            case_sensitive: false,
        }
    }

    pub fn implying(mut self, category: Category) -> Self {
        self.implies = Some(category);
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}

const NEGATIVE_LEMMAS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "horrendous", "disgusting", "revolting", "rude",
    "slow", "cold", "dirty", "stale", "bland", "tasteless", "overcooked", "undercooked",
    "burnt", "greasy", "oily", "soggy", "salty", "oversalted", "overpriced", "expensive",
    "pricey", "noisy", "loud", "smelly", "stuffy", "rotten", "sour", "mediocre",
    "disappointing", "disappoint", "unfriendly", "impolite", "careless", "incompetent",
    "indifferent", "unprofessional", "arrogant", "condescending", "tiny", "meager", "skimpy",
    "cramped", "crowded", "filthy", "gross", "poor", "wrong", "mistake", "forget", "ignore",
    "cockroach", "hair", "complaint", "problem", "issue", "yell", "shout", "lukewarm", "watery",
    "chewy", "tough", "inedible", "sloppy", "sticky", "stain", "mess", "messy", "chaos",
    "chaotic", "delay", "overcharge", "cheat", "scam", "pushy",
    "annoying", "unpleasant", "uncomfortable", "dull", "dreary", "shabby", "broken", "moldy",
    "mouldy", "smoky", "smokey", "stink", "regret", "refuse", "neglect", "unacceptable", "pathetic",
    "useless", "hate", "worst", "insult", "lie", "attitude",
];

const POSITIVE_LEMMAS: &[&str] = &[
    "good", "great", "excellent", "delicious", "tasty", "amazing", "awesome", "wonderful",
    "fantastic", "perfect", "friendly", "polite", "courteous", "attentive", "helpful", "cozy",
    "cosy", "clean", "fresh", "fast", "quick", "prompt", "nice", "lovely", "pleasant",
    "generous", "hearty", "professional", "knowledgeable", "welcoming", "superb", "outstanding",
    "yummy", "affordable", "reasonable", "love", "enjoy", "comfortable", "spotless", "efficient",
    "beautiful", "stylish", "charming", "recommend", "impressed", "impress", "satisfy",
    "satisfied", "juicy", "tender", "crispy", "flavorful", "flavourful", "cheerful", "smile",
    "smiling", "thank", "thanks", "caring", "quiet", "warm", "bright", "spacious",
    "tidy", "favorite", "favourite", "best", "gorgeous", "exquisite", "divine", "incredible",
    "fine",
];

/// Words that turn negative when negated
const NEGATABLE_WORDS: &[&str] = &[
    "like", "recommend", "enjoy", "impress", "satisfy", "return", "come", "work", "apologize",
    "apologise", "smile", "help", "clean", "fresh", "hot", "warm", "cook", "bring", "arrive",
    "answer", "respond", "notice", "listen", "understand", "care", "worth", "ready",
    "available", "serve", "check", "offer", "explain", "greet", "refill", "confirm",
];

/// Negative words whose negation reads as a positive ("not bad", "no complaints")
const LITOTES_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "disgusting", "expensive", "disappoint",
    "disappointing", "regret", "complain", "complaint", "problem", "issue", "worst",
];

const NEGATORS: &[&str] = &[
    "not", "no", "neither", "nor", "never", "hardly", "isn't", "wasn't", "weren't", "aren't",
    "don't", "doesn't", "didn't", "won't", "can't", "cannot", "couldn't", "wouldn't",
    "shouldn't", "haven't", "hasn't", "hadn't", "without",
];

/// Degree words that may sit between a negator and the negated word
const DEGREE_QUALIFIERS: &[&str] = &[
    "very", "so", "too", "that", "really", "particularly", "especially", "overly", "exactly",
    "quite", "all",
];

const NEGATIVE_PHRASES: &[&str] = &[
    "never again",
    "won't come back",
    "won't be back",
    "will not come back",
    "will not be back",
    "not coming back",
    "never coming back",
    "do not recommend",
    "don't recommend",
    "would not recommend",
    "wouldn't recommend",
    "can't recommend",
    "cannot recommend",
    "waste of money",
    "waste of time",
    "not worth",
    "food poisoning",
    "left hungry",
    "stay away",
    "rip off",
    "ripped off",
    "avoid this place",
    "worst experience",
];

const POSITIVE_PHRASES: &[&str] = &[
    "highly recommend",
    "definitely recommend",
    "will come back",
    "will be back",
    "will definitely return",
    "will definitely come back",
    "can't wait to come back",
    "must try",
    "worth every penny",
    "worth the wait",
    "worth it",
    "top notch",
    "blown away",
    "exceeded expectations",
    "exceeded our expectations",
    "five stars",
    "5 stars",
    "love this place",
    "loved this place",
    "melt in your mouth",
    "value for money",
    "no complaints",
];

const ADVERB_TO_ADJECTIVE: &[(&str, &str)] = &[
    ("deliciously", "delicious"),
    ("tastily", "tasty"),
    ("quickly", "quick"),
    ("promptly", "prompt"),
    ("fastly", "fast"),
    ("slowly", "slow"),
    ("rudely", "rude"),
    ("politely", "polite"),
    ("nicely", "nice"),
    ("badly", "bad"),
    ("perfectly", "perfect"),
    ("terribly", "terrible"),
    ("horribly", "horrible"),
    ("awfully", "awful"),
    ("beautifully", "beautiful"),
    ("cozily", "cozy"),
    ("comfortably", "comfortable"),
    ("pleasantly", "pleasant"),
    ("professionally", "professional"),
    ("carelessly", "careless"),
    ("attentively", "attentive"),
    ("warmly", "warm"),
    ("coldly", "cold"),
    ("dirtily", "dirty"),
    ("cleanly", "clean"),
    ("generously", "generous"),
    ("efficiently", "efficient"),
    ("friendlily", "friendly"),
    ("wonderfully", "wonderful"),
    ("excellently", "excellent"),
    ("poorly", "poor"),
];

/// Tokens that carry no sentiment in this domain despite dictionary entries
const EXCLUDED_FROM_SENTIMENT: &[&str] = &[
    "well", "like", "pretty", "just", "right", "kind", "mean", "rare", "plain", "light", "dark",
    "sharp", "sweet", "hot", "spicy", "strong", "free", "top", "fair", "even", "still",
    "cheap", "fancy", "rich", "heavy", "simple",
];

/// Markers of a comparison with another venue
const COMPARATIVE_CONTEXT_MARKERS: &[&str] = &[
    "in another place",
    "at another place",
    "in other places",
    "at other places",
    "other restaurants",
    "other cafes",
    "elsewhere",
    "than at",
    "than in",
    "compared to",
    "compared with",
    "than usual",
];

fn wait_time_patterns() -> Vec<PhrasePattern> {
    use Polarity::Negative;
    vec![
        PhrasePattern::regex(
            r"\bwait(?:ed|ing)?\s+(?:for\s+)?(?:about\s+|almost\s+|over\s+|more\s+than\s+|nearly\s+)?(?:an?\s+|\d+\s*|one\s+|two\s+|half\s+an?\s+)(?:hour|hours|hrs?|minutes|mins)\b",
            Negative,
            "long wait",
        ),
        PhrasePattern::regex(
            r"\b(?:an?|one|two|\d+)\s+hours?\s+(?:of\s+)?wait(?:ed|ing)?\b",
            Negative,
            "long wait",
        ),
        PhrasePattern::regex(
            r"\btook\s+(?:forever|ages|an?\s+hour|over\s+an?\s+hour|\d+\s*(?:minutes|mins|hours))\b",
            Negative,
            "long wait",
        ),
        PhrasePattern::regex(r"\bwait(?:ed|ing)?\s+(?:forever|ages)\b", Negative, "long wait"),
        PhrasePattern::regex(
            r"\b(?:did\s+not|didn't|never)\s+confirm(?:ed)?\b",
            Negative,
            "refusal",
        ),
        PhrasePattern::regex(r"\b(?:HOURS?|FOREVER)\b", Negative, "emphatic wait")
            .case_sensitive(),
    ]
}

fn personnel_negative_patterns() -> Vec<PhrasePattern> {
    use Polarity::Negative;
    let staff = r"(?:waiter|waitress|server|staff|bartender|hostess|host|manager|administrator|admin|cashier|barista)";
    vec![
        PhrasePattern::regex(
            format!(
                r"\b{}s?\s+(?:\w+\s+)?(?:forgot|ignored|yelled|shouted|argued|refused|lied|snapped|sighed|rolled)\b",
                staff
            ),
            Negative,
            "staff misconduct",
        )
        .implying(Category::Service),
        PhrasePattern::regex(
            r"\bforgot\s+(?:about\s+)?(?:us|our\s+order|my\s+order|our\s+drinks|my\s+drink)\b",
            Negative,
            "forgotten order",
        )
        .implying(Category::Service),
        PhrasePattern::regex(
            r"\bno(?:body|\s+one)\s+(?:came|served|approached|greeted|answered|cared)\b",
            Negative,
            "ignored guests",
        )
        .implying(Category::Service),
        PhrasePattern::regex(
            r"\b(?:never|didn't|did\s+not|without\s+an?)\s+apologi[sz](?:e|ed|ing|y)\b",
            Negative,
            "no apology",
        )
        .implying(Category::Service),
        PhrasePattern::regex(
            r"\brolled\s+(?:his|her|their)\s+eyes\b",
            Negative,
            "disrespect",
        )
        .implying(Category::Service),
    ]
}

fn comfort_negative_patterns() -> Vec<PhrasePattern> {
    use Polarity::Negative;
    vec![
        PhrasePattern::regex(
            r"\b(?:smell(?:s|ed|ing)?|reek(?:s|ed|ing)?|stank|stinks?)\s+(?:of|like)\s+(?:cigarette\s+|tobacco\s+)?smoke\b",
            Negative,
            "smoke",
        )
        .implying(Category::Comfort),
        PhrasePattern::regex(
            r"\b(?:full\s+of|clouds?\s+of|cigarette|tobacco)\s+smoke\b|\bsmoke[- ]filled\b",
            Negative,
            "smoke",
        )
        .implying(Category::Comfort),
        PhrasePattern::regex(
            r"\b(?:people|guests|everyone|staff)\s+(?:were\s+|was\s+)?smoking\b",
            Negative,
            "smoke",
        )
        .implying(Category::Comfort),
    ]
}

fn to_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// General-purpose word → polarity dictionary
#[derive(Debug, Clone, Default)]
pub struct GeneralLexicon {
    entries: HashMap<String, Polarity>,
}

impl GeneralLexicon {
    /// Parse the dictionary format.
    ///
    /// One entry per line: `word, part_of_speech, lemma, sentiment, source`.
    /// Lines starting with `!` are comments. Only `positive` and `negative`
    /// entries are kept.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('!') {
                continue;
            }
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            if parts.len() < 4 {
                continue;
            }
            let polarity = match parts[3] {
                "positive" => Polarity::Positive,
                "negative" => Polarity::Negative,
                _ => continue,
            };
            entries.insert(parts[2].to_lowercase(), polarity);
        }
        Self { entries }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::lexicon(format!(
                "Failed to read general lexicon {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Self::parse(&content))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Polarity)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, word: &str) -> Option<Polarity> {
        self.entries.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All sentiment lexicons used by the analyzer
#[derive(Debug)]
pub struct LexiconStore {
    pub negative_lemmas: HashSet<String>,
    pub positive_lemmas: HashSet<String>,
    pub negatable_words: HashSet<String>,
    pub litotes_words: HashSet<String>,
    pub negators: HashSet<String>,
    pub degree_qualifiers: HashSet<String>,
    pub negative_phrases: Vec<PhrasePattern>,
    pub positive_phrases: Vec<PhrasePattern>,
    pub wait_time_patterns: Vec<PhrasePattern>,
    pub personnel_negative_patterns: Vec<PhrasePattern>,
    pub comfort_negative_patterns: Vec<PhrasePattern>,
    pub adverb_to_adjective: HashMap<String, String>,
    pub excluded_from_sentiment: HashSet<String>,
    pub comparative_context_markers: Vec<String>,
    general_path: Option<PathBuf>,
    general: OnceLock<GeneralLexicon>,
}

impl LexiconStore {
    /// Built-in hospitality lexicons, without a general dictionary
    pub fn horeca() -> Self {
        Self {
            negative_lemmas: to_set(NEGATIVE_LEMMAS),
            positive_lemmas: to_set(POSITIVE_LEMMAS),
            negatable_words: to_set(NEGATABLE_WORDS),
            litotes_words: to_set(LITOTES_WORDS),
            negators: to_set(NEGATORS),
            degree_qualifiers: to_set(DEGREE_QUALIFIERS),
            negative_phrases: NEGATIVE_PHRASES
                .iter()
                .map(|p| PhrasePattern::literal(*p, Polarity::Negative))
                .collect(),
            positive_phrases: POSITIVE_PHRASES
                .iter()
                .map(|p| PhrasePattern::literal(*p, Polarity::Positive))
                .collect(),
            wait_time_patterns: wait_time_patterns(),
            personnel_negative_patterns: personnel_negative_patterns(),
            comfort_negative_patterns: comfort_negative_patterns(),
            adverb_to_adjective: ADVERB_TO_ADJECTIVE
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            excluded_from_sentiment: to_set(EXCLUDED_FROM_SENTIMENT),
            comparative_context_markers: COMPARATIVE_CONTEXT_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            general_path: None,
            general: OnceLock::new(),
        }
    }

    /// A store with no entries at all, for building substitute lexicons
    pub fn empty() -> Self {
        Self {
            negative_lemmas: HashSet::new(),
            positive_lemmas: HashSet::new(),
            negatable_words: HashSet::new(),
            litotes_words: HashSet::new(),
            negators: HashSet::new(),
            degree_qualifiers: HashSet::new(),
            negative_phrases: Vec::new(),
            positive_phrases: Vec::new(),
            wait_time_patterns: Vec::new(),
            personnel_negative_patterns: Vec::new(),
            comfort_negative_patterns: Vec::new(),
            adverb_to_adjective: HashMap::new(),
            excluded_from_sentiment: HashSet::new(),
            comparative_context_markers: Vec::new(),
            general_path: None,
            general: OnceLock::new(),
        }
    }

    /// Load the general dictionary from `path` on first use
    pub fn with_general_lexicon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.general_path = Some(path.into());
        self
    }

    /// Use an already-built general dictionary
    pub fn with_general_lexicon(self, lexicon: GeneralLexicon) -> Self {
        let _ = self.general.set(lexicon);
        self
    }

    /// The general dictionary; an absent or unreadable file yields an empty one
    pub fn general(&self) -> &GeneralLexicon {
        self.general.get_or_init(|| match &self.general_path {
            None => GeneralLexicon::default(),
            Some(path) if !path.exists() => {
                tracing::warn!("General lexicon not found at {}", path.display());
                GeneralLexicon::default()
            }
            Some(path) => match GeneralLexicon::from_file(path) {
                Ok(lexicon) => {
                    tracing::info!("✓ General lexicon loaded: {} words", lexicon.len());
                    lexicon
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    GeneralLexicon::default()
                }
            },
        })
    }

    /// Every single-word lemma the domain lists know about
    pub fn vocabulary(&self) -> impl Iterator<Item = &String> {
        self.negative_lemmas
            .iter()
            .chain(&self.positive_lemmas)
            .chain(&self.negatable_words)
            .chain(&self.litotes_words)
            .chain(self.adverb_to_adjective.values())
    }

    pub fn is_negator(&self, word: &str) -> bool {
        self.negators.contains(word)
    }

    pub fn is_degree_qualifier(&self, word: &str) -> bool {
        self.degree_qualifiers.contains(word)
    }

    pub fn is_excluded(&self, word: &str) -> bool {
        self.excluded_from_sentiment.contains(word)
    }

    /// Polarity from the domain lists; negative entries take precedence
    pub fn domain_polarity(&self, lemma: &str) -> Option<Polarity> {
        if self.negative_lemmas.contains(lemma) {
            Some(Polarity::Negative)
        } else if self.positive_lemmas.contains(lemma) {
            Some(Polarity::Positive)
        } else {
            None
        }
    }
}

impl Default for LexiconStore {
    fn default() -> Self {
        Self::horeca()
    }
}
