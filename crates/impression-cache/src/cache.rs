//! The analysis cache

use crate::backend::CacheBackend;
use crate::config::CacheConfig;
use crate::key::cache_key;
use impression_core::{AnalysisResult, Result};
use impression_engine::ReviewAnalyzer;
use std::sync::Arc;
use std::time::Duration;

/// Memoizes `analyze(text, rating)` in a pluggable backend
pub struct AnalysisCache {
    backend: Arc<dyn CacheBackend>,
    analyzer: Arc<dyn ReviewAnalyzer>,
    ttl: Duration,
    key_prefix: String,
}

impl AnalysisCache {
    pub fn new(
        backend: Arc<dyn CacheBackend>,
        analyzer: Arc<dyn ReviewAnalyzer>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            backend,
            analyzer,
            ttl: config.ttl(),
            key_prefix: config.key_prefix.clone(),
        }
    }

    /// Backend from `config`
    pub fn from_config(analyzer: Arc<dyn ReviewAnalyzer>, config: &CacheConfig) -> Result<Self> {
        let backend = config.build_backend()?;
        tracing::info!(
            "✓ Analysis cache ready (backend: {}, ttl: {}s)",
            backend.name(),
            config.ttl_secs
        );
        Ok(Self::new(backend, analyzer, config))
    }

    pub fn key(&self, text: &str, rating: u8) -> String {
        cache_key(&self.key_prefix, text, rating)
    }

    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    pub fn analyzer(&self) -> &Arc<dyn ReviewAnalyzer> {
        &self.analyzer
    }

    /// Cached result, or a fresh analysis stored for the TTL.
    ///
    /// `force_refresh` skips the lookup and overwrites the entry. Backend
    /// errors are logged and behave like a miss.
    pub async fn get_or_compute(
        &self,
        text: &str,
        rating: u8,
        force_refresh: bool,
    ) -> AnalysisResult {
        let key = self.key(text, rating);

        if !force_refresh {
            if let Some(result) = self.lookup(&key).await {
                return result;
            }
        }

        let result = self.analyzer.analyze(text, rating).await;
        self.store(&key, &result).await;
        result
    }

    /// Drop the entry for one review. A backend failure is logged; the
    /// entry then lives until its TTL.
    pub async fn invalidate(&self, text: &str, rating: u8) {
        let key = self.key(text, rating);
        match self.backend.delete(&key).await {
            Ok(()) => tracing::debug!("Invalidated {}", key),
            Err(e) => {
                tracing::warn!("Cache delete failed on {}: {}", self.backend.name(), e);
                record("error");
            }
        }
    }

    /// Drop every entry under this cache's key prefix; returns how many
    /// were removed, 0 when the backend is unreachable
    pub async fn clear_all(&self) -> usize {
        match self.backend.clear(&format!("{}:", self.key_prefix)).await {
            Ok(removed) => {
                tracing::info!("Cleared {} cached analyses", removed);
                removed
            }
            Err(e) => {
                tracing::warn!("Cache clear failed on {}: {}", self.backend.name(), e);
                record("error");
                0
            }
        }
    }

    async fn lookup(&self, key: &str) -> Option<AnalysisResult> {
        let cached = match self.backend.get(key).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Cache read failed on {}: {}", self.backend.name(), e);
                record("error");
                return None;
            }
        };

        let Some(raw) = cached else {
            record("miss");
            return None;
        };

        match serde_json::from_str(&raw) {
            Ok(result) => {
                record("hit");
                Some(result)
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry {}: {}", key, e);
                record("error");
                None
            }
        }
    }

    async fn store(&self, key: &str, result: &AnalysisResult) {
        let value = match serde_json::to_string(result) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to serialize analysis for cache: {}", e);
                return;
            }
        };
        if let Err(e) = self.backend.set(key, value, self.ttl).await {
            tracing::warn!("Cache write failed on {}: {}", self.backend.name(), e);
        }
    }
}

fn record(outcome: &'static str) {
    metrics::counter!("impression_cache_requests_total", "outcome" => outcome).increment(1);
}
