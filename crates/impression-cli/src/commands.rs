//! Single-review commands

use impression_cache::AnalysisCache;
use impression_core::{AnalysisResult, Error, ImpressionTag, Result};
use impression_engine::is_complex;
use serde::{Deserialize, Serialize};

/// `analyze` output: the result plus its complexity flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeOutput {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub tags_complex: bool,
}

/// Tag as submitted by a person, by display names
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedTag {
    pub category: String,
    pub subcategory: String,
    pub sentiment: String,
}

pub async fn analyze_review(
    cache: &AnalysisCache,
    text: &str,
    rating: u8,
    force_refresh: bool,
) -> Result<AnalyzeOutput> {
    validate_rating(rating)?;
    let result = cache.get_or_compute(text, rating, force_refresh).await;
    let tags_complex = is_complex(rating, &result.tags);
    Ok(AnalyzeOutput {
        result,
        tags_complex,
    })
}

/// Parse and validate a JSON array of submitted tags against the taxonomy
pub fn parse_tags(json: &str) -> Result<Vec<ImpressionTag>> {
    let submitted: Vec<SubmittedTag> = serde_json::from_str(json)?;
    submitted
        .iter()
        .map(|tag| ImpressionTag::parse(&tag.category, &tag.subcategory, &tag.sentiment))
        .collect()
}

pub fn check_complex(rating: u8, tags_json: &str) -> Result<bool> {
    validate_rating(rating)?;
    let tags = parse_tags(tags_json)?;
    Ok(is_complex(rating, &tags))
}

pub(crate) fn validate_rating(rating: u8) -> Result<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(Error::config(format!(
            "rating must be between 1 and 5, got {}",
            rating
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impression_core::{Category, Sentiment, Subcategory};

    #[test]
    fn test_parse_tags() {
        let tags = parse_tags(
            r#"[{"category": "Service", "subcategory": "Rudeness/conflict", "sentiment": "negative"},
                {"category": "Product", "subcategory": "Food/cuisine", "sentiment": "positive"}]"#,
        )
        .unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].category, Category::Service);
        assert_eq!(tags[0].subcategory, Subcategory::Rudeness);
        assert_eq!(tags[1].sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_parse_tags_rejects_mismatch() {
        let err = parse_tags(
            r#"[{"category": "Price", "subcategory": "Food/cuisine", "sentiment": "positive"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Taxonomy(_)));

        let err = parse_tags(
            r#"[{"category": "Service", "subcategory": "Valet", "sentiment": "positive"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Taxonomy(_)));

        assert!(matches!(
            parse_tags("not json").unwrap_err(),
            Error::Serialization(_)
        ));
    }

    #[test]
    fn test_check_complex() {
        let positive_only =
            r#"[{"category": "Product", "subcategory": "Food/cuisine", "sentiment": "positive"}]"#;
        assert!(check_complex(2, positive_only).unwrap());
        assert!(!check_complex(5, positive_only).unwrap());
        assert!(check_complex(0, positive_only).is_err());
    }
}
