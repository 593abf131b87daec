//! Impression Cache
//!
//! Content-addressed memoization of review analysis. Entries are keyed by a
//! hash of the review text plus its rating and expire after a TTL. Backend
//! failures never reach the caller: a failing read is a miss and a failing
//! write is logged and dropped.

pub mod backend;
pub mod cache;
pub mod config;
pub mod key;
pub mod redis_backend;

pub use backend::{CacheBackend, MemoryBackend};
pub use cache::AnalysisCache;
pub use config::{BackendSpec, CacheConfig};
pub use key::cache_key;
pub use redis_backend::RedisBackend;
