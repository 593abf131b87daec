//! Impression CLI
//!
//! Library half of the `impression` binary: layered configuration, the
//! single-review commands and the bulk re-analysis runner.

pub mod commands;
pub mod config;
pub mod reanalyze;

pub use commands::{analyze_review, check_complex, parse_tags, AnalyzeOutput, SubmittedTag};
pub use config::AppConfig;
pub use reanalyze::{reanalyze, ReanalyzeOptions, ReanalyzeReport, ReviewRecord, TagStats};

use impression_cache::AnalysisCache;
use impression_core::Result;
use impression_engine::ImpressionAnalyzer;
use std::sync::Arc;

/// Engine wrapped in the configured cache
pub fn build_cache(config: &AppConfig) -> Result<Arc<AnalysisCache>> {
    let analyzer = ImpressionAnalyzer::from_config(&config.engine)?;
    let cache = AnalysisCache::from_config(Arc::new(analyzer), &config.cache)?;
    Ok(Arc::new(cache))
}
