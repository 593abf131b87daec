//! Core types for impression analysis

use crate::error::{Error, Result};
use crate::taxonomy::{Category, Subcategory};
use serde::{Deserialize, Serialize};

/// Maximum number of evidence strings kept on a tag
pub const MAX_EVIDENCE: usize = 3;

/// Sentiment of a tag or of a whole review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Fixed rating → sentiment mapping (4-5 positive, 1-2 negative, 3 neutral)
    pub fn from_rating(rating: u8) -> Self {
        if rating >= 4 {
            Self::Positive
        } else if rating <= 2 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Majority vote between weighted counts; ties are neutral
    pub fn from_counts(positive: u32, negative: u32) -> Self {
        if negative > positive {
            Self::Negative
        } else if positive > negative {
            Self::Positive
        } else {
            Self::Neutral
        }
    }

    /// Signed unit score: +1, -1 or 0
    pub fn unit_score(&self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
            Self::Neutral => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Polarity of a single lexicon signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn flipped(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

impl From<Polarity> for Sentiment {
    fn from(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Positive => Sentiment::Positive,
            Polarity::Negative => Sentiment::Negative,
        }
    }
}

/// A sentiment signal found in the review text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentWord {
    /// Text as it appears in the review (a word, a phrase or a pattern match)
    pub surface: String,
    /// Base form, or a pattern description for pattern matches
    pub lemma: String,
    pub polarity: Polarity,
    /// Byte offset into the review text
    pub offset: usize,
    /// Aggregation weight (a written-out negation counts double)
    pub weight: u32,
}

impl SentimentWord {
    pub fn new(
        surface: impl Into<String>,
        lemma: impl Into<String>,
        polarity: Polarity,
        offset: usize,
    ) -> Self {
        Self {
            surface: surface.into(),
            lemma: lemma.into(),
            polarity,
            offset,
            weight: 1,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

/// One occurrence of a category-indicating word (or an implied one)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMarker {
    pub category: Category,
    pub marker_word: String,
    /// Byte offset into the review text
    pub offset: usize,
}

impl CategoryMarker {
    pub fn new(category: Category, marker_word: impl Into<String>, offset: usize) -> Self {
        Self {
            category,
            marker_word: marker_word.into(),
            offset,
        }
    }
}

/// Output unit of the analysis: one aspect of the customer experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawImpressionTag")]
pub struct ImpressionTag {
    pub category: Category,
    pub subcategory: Subcategory,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub marker: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl ImpressionTag {
    /// Build a tag; the category is derived from the subcategory so the
    /// pair is always consistent with the taxonomy.
    pub fn new(
        subcategory: Subcategory,
        sentiment: Sentiment,
        marker: impl Into<String>,
        evidence: Vec<String>,
    ) -> Self {
        let mut evidence = evidence;
        evidence.truncate(MAX_EVIDENCE);
        Self {
            category: subcategory.category(),
            subcategory,
            sentiment,
            marker: marker.into(),
            evidence,
        }
    }

    /// Build a tag from an explicit category/subcategory pair
    pub fn with_category(
        category: Category,
        subcategory: Subcategory,
        sentiment: Sentiment,
        marker: impl Into<String>,
        evidence: Vec<String>,
    ) -> Result<Self> {
        if !category.contains(subcategory) {
            return Err(Error::taxonomy(format!(
                "subcategory '{}' does not belong to category '{}'",
                subcategory, category
            )));
        }
        Ok(Self::new(subcategory, sentiment, marker, evidence))
    }

    /// The generic "General impression" tag
    pub fn general(sentiment: Sentiment, marker: impl Into<String>, evidence: Vec<String>) -> Self {
        Self::new(Subcategory::GeneralImpression, sentiment, marker, evidence)
    }

    /// Validate a manually submitted tag given by display names
    pub fn parse(category: &str, subcategory: &str, sentiment: &str) -> Result<Self> {
        let category_value = Category::from_name(category)
            .ok_or_else(|| Error::taxonomy(format!("unknown category '{}'", category)))?;
        let subcategory_value = Subcategory::from_name(subcategory)
            .ok_or_else(|| Error::taxonomy(format!("unknown subcategory '{}'", subcategory)))?;
        let sentiment_value = Sentiment::parse(sentiment)
            .ok_or_else(|| Error::taxonomy(format!("unknown sentiment '{}'", sentiment)))?;

        Self::with_category(
            category_value,
            subcategory_value,
            sentiment_value,
            String::new(),
            Vec::new(),
        )
    }

    /// Key used for deduplication
    pub fn key(&self) -> (Category, Subcategory) {
        (self.category, self.subcategory)
    }
}

#[derive(Deserialize)]
struct RawImpressionTag {
    category: Category,
    subcategory: Subcategory,
    sentiment: Sentiment,
    #[serde(default)]
    marker: String,
    #[serde(default)]
    evidence: Vec<String>,
}

impl TryFrom<RawImpressionTag> for ImpressionTag {
    type Error = Error;

    fn try_from(raw: RawImpressionTag) -> Result<Self> {
        Self::with_category(
            raw.category,
            raw.subcategory,
            raw.sentiment,
            raw.marker,
            raw.evidence,
        )
    }
}

/// Result of analysing one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tags: Vec<ImpressionTag>,
    /// Overall sentiment in [-1, 1], two-decimal precision
    pub sentiment_score: f32,
}

impl AnalysisResult {
    /// Create a result, clamping and rounding the score
    pub fn new(tags: Vec<ImpressionTag>, sentiment_score: f32) -> Self {
        Self {
            tags,
            sentiment_score: normalize_score(sentiment_score),
        }
    }

    pub fn positive_tags(&self) -> usize {
        self.tags
            .iter()
            .filter(|t| t.sentiment == Sentiment::Positive)
            .count()
    }

    pub fn negative_tags(&self) -> usize {
        self.tags
            .iter()
            .filter(|t| t.sentiment == Sentiment::Negative)
            .count()
    }
}

fn normalize_score(score: f32) -> f32 {
    if !score.is_finite() {
        return 0.0;
    }
    (score.clamp(-1.0, 1.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rating_mapping() {
        assert_eq!(Sentiment::from_rating(5), Sentiment::Positive);
        assert_eq!(Sentiment::from_rating(4), Sentiment::Positive);
        assert_eq!(Sentiment::from_rating(3), Sentiment::Neutral);
        assert_eq!(Sentiment::from_rating(2), Sentiment::Negative);
        assert_eq!(Sentiment::from_rating(1), Sentiment::Negative);
    }

    #[test]
    fn test_tag_serialization_shape() {
        let tag = ImpressionTag::new(
            Subcategory::FoodCuisine,
            Sentiment::Positive,
            "food",
            vec!["great".to_string()],
        );
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["category"], "Product");
        assert_eq!(json["subcategory"], "Food/cuisine");
        assert_eq!(json["sentiment"], "positive");
        assert_eq!(json["evidence"][0], "great");

        let back: ImpressionTag = serde_json::from_value(json).unwrap();
        assert_eq!(back, tag);
    }

    #[test]
    fn test_evidence_is_capped() {
        let evidence = (0..6).map(|i| format!("w{}", i)).collect();
        let tag = ImpressionTag::general(Sentiment::Neutral, "-", evidence);
        assert_eq!(tag.evidence.len(), MAX_EVIDENCE);
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let err = ImpressionTag::with_category(
            Category::Price,
            Subcategory::Rudeness,
            Sentiment::Negative,
            "",
            vec![],
        );
        assert!(matches!(err, Err(Error::Taxonomy(_))));

        let json = r#"{"category":"Price","subcategory":"Rudeness/conflict","sentiment":"negative"}"#;
        assert!(serde_json::from_str::<ImpressionTag>(json).is_err());
    }

    #[test]
    fn test_manual_tag_parsing() {
        let tag = ImpressionTag::parse("Service", "Politeness/respect", "positive").unwrap();
        assert_eq!(tag.category, Category::Service);
        assert_eq!(tag.subcategory, Subcategory::Politeness);

        assert!(ImpressionTag::parse("Service", "Politeness/respect", "great").is_err());
        assert!(ImpressionTag::parse("Speed", "Politeness/respect", "positive").is_err());
        assert!(ImpressionTag::parse("Vibes", "Politeness/respect", "positive").is_err());
    }

    #[test]
    fn test_score_rounding() {
        let result = AnalysisResult::new(vec![], 1.0 / 3.0);
        assert_eq!(result.sentiment_score, 0.33);
        assert_eq!(AnalysisResult::new(vec![], f32::NAN).sentiment_score, 0.0);
    }

    proptest! {
        #[test]
        fn prop_score_always_in_range(score in proptest::num::f32::ANY) {
            let result = AnalysisResult::new(vec![], score);
            prop_assert!((-1.0..=1.0).contains(&result.sentiment_score));
        }
    }
}
