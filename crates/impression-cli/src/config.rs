//! Application configuration
//!
//! An optional YAML file, overridden by `IMPRESSION__SECTION__KEY`
//! environment variables.

use impression_cache::CacheConfig;
use impression_core::{Error, Result};
use impression_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "IMPRESSION";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load from `path` (skipped when absent) plus the environment
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(
            path,
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn load_with(path: impl AsRef<Path>, environment: config::Environment) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(environment)
            .build()
            .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;

        settings
            .try_deserialize()
            .map_err(|e| Error::config(format!("Invalid configuration: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impression_cache::BackendSpec;
    use impression_engine::ScoringStrategy;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load_with("/nonexistent/impression.yaml", env(&[])).unwrap();
        assert_eq!(config.cache.key_prefix, "review_analysis");
        assert_eq!(config.engine.scoring, ScoringStrategy::default());
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "cache:\n  backend:\n    type: redis\n    url: redis://localhost:6379\n  ttl_secs: 120\nengine:\n  scoring:\n    type: rating_fallback\n"
        )
        .unwrap();

        let config =
            AppConfig::load_with(file.path(), env(&[("IMPRESSION__CACHE__TTL_SECS", "30")]))
                .unwrap();
        assert_eq!(config.cache.ttl_secs, 30);
        assert_eq!(
            config.cache.backend,
            BackendSpec::Redis {
                url: "redis://localhost:6379".to_string()
            }
        );
        assert_eq!(config.engine.scoring, ScoringStrategy::RatingFallback);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "cache:\n  ttl_secs: [not, a, number]").unwrap();
        let err = AppConfig::load_with(file.path(), env(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
