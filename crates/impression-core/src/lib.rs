//! Impression Core
//!
//! Core types, taxonomy, and error handling shared across the impression
//! analysis components.
//!
//! This crate provides:
//! - The closed HoReCa category/subcategory taxonomy
//! - Output types (`ImpressionTag`, `AnalysisResult`) validated at construction
//! - Transient pipeline types (`SentimentWord`, `CategoryMarker`)
//! - Error types and result handling

pub mod error;
pub mod taxonomy;
pub mod types;

pub use error::{Error, Result};
pub use taxonomy::{Category, Subcategory};
pub use types::{
    AnalysisResult, CategoryMarker, ImpressionTag, Polarity, Sentiment, SentimentWord,
    MAX_EVIDENCE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::taxonomy::{Category, Subcategory};
    pub use crate::types::{AnalysisResult, ImpressionTag, Polarity, Sentiment};
}
