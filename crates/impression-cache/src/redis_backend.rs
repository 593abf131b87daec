//! Shared Redis backend

use crate::backend::CacheBackend;
use async_trait::async_trait;
use impression_core::{Error, Result};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;

const SCAN_BATCH: usize = 500;

/// Bound on establishing a connection
const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
/// Bound on a single command round-trip
const RESPONSE_TIMEOUT: Duration = Duration::from_millis(500);
/// After a failed connect, requests fail immediately for this long
const RECONNECT_COOLDOWN: Duration = Duration::from_secs(5);

/// Redis backend; connects on first use so an unreachable server only
/// produces per-request errors. Connecting is never retried with backoff:
/// a failed attempt fails the request and opens a short cooldown.
pub struct RedisBackend {
    client: Client,
    manager: OnceCell<ConnectionManager>,
    last_failure: Mutex<Option<Instant>>,
}

impl RedisBackend {
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| Error::cache(format!("Redis client creation failed: {}", e)))?;
        Ok(Self {
            client,
            manager: OnceCell::new(),
            last_failure: Mutex::new(None),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        if let Some(manager) = self.manager.get() {
            return Ok(manager.clone());
        }

        if let Some(failed_at) = *self.last_failure.lock() {
            if failed_at.elapsed() < RECONNECT_COOLDOWN {
                return Err(Error::cache("Redis unavailable (reconnect cooling down)"));
            }
        }

        let manager = self
            .manager
            .get_or_try_init(|| async {
                // exponent base 2, factor 100ms, zero retries
                let manager = ConnectionManager::new_with_backoff_and_timeouts(
                    self.client.clone(),
                    2,
                    100,
                    0,
                    RESPONSE_TIMEOUT,
                    CONNECT_TIMEOUT,
                )
                .await
                .map_err(|e| {
                    *self.last_failure.lock() = Some(Instant::now());
                    Error::cache(format!("Redis connection failed: {}", e))
                })?;
                tracing::info!("✓ Connected to Redis cache");
                Ok::<_, Error>(manager)
            })
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        conn.get(key)
            .await
            .map_err(|e| Error::cache(format!("Redis GET failed: {}", e)))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.set_ex(key, value, ttl.as_secs().max(1))
            .await
            .map_err(|e| Error::cache(format!("Redis SET failed: {}", e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.del(key)
            .await
            .map_err(|e| Error::cache(format!("Redis DEL failed: {}", e)))
    }

    async fn clear(&self, prefix: &str) -> Result<usize> {
        let mut conn = self.connection().await?;
        let pattern = format!("{}*", prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| Error::cache(format!("Redis SCAN failed: {}", e)))?;

            if !keys.is_empty() {
                let deleted: usize = conn
                    .del(&keys)
                    .await
                    .map_err(|e| Error::cache(format!("Redis DEL failed: {}", e)))?;
                removed += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(removed)
    }

    fn name(&self) -> &str {
        "redis"
    }
}
