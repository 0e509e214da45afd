//! Redis backend for the link cache.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "link:";

fn link_key(short_code: &str) -> String {
    format!("{KEY_PREFIX}{short_code}")
}

/// Resolved links serialized as JSON under `link:<short_code>`.
///
/// Redis failures after startup never reach the caller: reads turn into
/// misses and writes into no-ops, each with a log line.
pub struct RedisCache {
    conn: ConnectionManager,
    max_ttl: u64,
}

impl RedisCache {
    /// Opens a managed connection and checks it with `PING`.
    ///
    /// `max_ttl_seconds` comes from `CACHE_TTL_SECONDS`. It is the lifetime of
    /// entries for links without expiry and the upper bound for all others.
    pub async fn connect(redis_url: &str, max_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::ConnectionError(format!("invalid Redis URL: {e}")))?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis unreachable: {e}")))?;
        conn.ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {e}")))?;

        info!(ttl = max_ttl_seconds, "Redis link cache ready");
        Ok(Self {
            conn,
            max_ttl: max_ttl_seconds,
        })
    }

    fn effective_ttl(&self, requested: Option<u64>) -> u64 {
        requested.map_or(self.max_ttl, |secs| secs.min(self.max_ttl))
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<Link>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(link_key(short_code)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(short_code, error = %e, "Redis GET failed, treating as miss");
                return Ok(None);
            }
        };

        let Some(raw) = raw else {
            debug!(short_code, "link cache miss");
            return Ok(None);
        };

        match serde_json::from_str::<Link>(&raw) {
            Ok(link) => {
                debug!(short_code, "link cache hit");
                Ok(Some(link))
            }
            Err(e) => {
                warn!(short_code, error = %e, "ignoring undecodable link cache entry");
                Ok(None)
            }
        }
    }

    async fn set_link(&self, link: &Link, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let ttl = self.effective_ttl(ttl_seconds);
        if ttl == 0 {
            return Ok(());
        }

        let payload = serde_json::to_string(link)
            .map_err(|e| CacheError::OperationError(format!("cannot encode link: {e}")))?;

        let mut conn = self.conn.clone();
        let stored: redis::RedisResult<()> =
            conn.set_ex(link_key(&link.short_code), payload, ttl).await;
        match stored {
            Ok(()) => debug!(short_code = %link.short_code, ttl, "link cached"),
            Err(e) => warn!(short_code = %link.short_code, error = %e, "Redis SETEX failed"),
        }
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let removed: redis::RedisResult<i64> = conn.del(link_key(short_code)).await;
        match removed {
            Ok(0) => {}
            Ok(_) => debug!(short_code, "link cache entry dropped"),
            Err(e) => warn!(short_code, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_key_is_namespaced() {
        assert_eq!(link_key("abc123"), "link:abc123");
    }
}
