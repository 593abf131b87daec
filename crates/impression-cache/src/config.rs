//! Cache configuration

use crate::backend::{CacheBackend, MemoryBackend};
use crate::redis_backend::RedisBackend;
use impression_core::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Seven days
const DEFAULT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: BackendSpec,

    /// Lifetime of an entry in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackendSpec::default(),
            ttl_secs: DEFAULT_TTL_SECS,
            key_prefix: default_key_prefix(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn build_backend(&self) -> Result<Arc<dyn CacheBackend>> {
        self.backend.build()
    }
}

/// Backend selection (for config files)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendSpec {
    #[default]
    Memory,
    Redis {
        url: String,
    },
}

impl BackendSpec {
    pub fn build(&self) -> Result<Arc<dyn CacheBackend>> {
        match self {
            Self::Memory => Ok(Arc::new(MemoryBackend::new())),
            Self::Redis { url } => Ok(Arc::new(RedisBackend::new(url)?)),
        }
    }
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_key_prefix() -> String {
    "review_analysis".to_string()
}
