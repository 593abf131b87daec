//! Error types for the impression engine

/// Result type alias using the engine's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for impression analysis operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Category/subcategory/sentiment outside the closed taxonomy
    #[error("taxonomy error: {0}")]
    Taxonomy(String),

    /// Lexicon resource errors
    #[error("lexicon error: {0}")]
    Lexicon(String),

    /// Classifier loading or inference errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Cache backend errors
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new taxonomy error
    pub fn taxonomy(msg: impl Into<String>) -> Self {
        Self::Taxonomy(msg.into())
    }

    /// Create a new lexicon error
    pub fn lexicon(msg: impl Into<String>) -> Self {
        Self::Lexicon(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new cache error
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
