//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Link;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache for the redirect path.
///
/// Entries are whole [`Link`] records keyed by short code, so the resolver
/// can re-check `expires_at` on every hit. The cached `click_count` is a
/// snapshot and must not be reported to clients.
///
/// Implementations must be thread-safe and fail open: a broken cache
/// degrades to store lookups, never to failed redirects.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached link.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<Link>>;

    /// Stores a link with an optional TTL in seconds
    /// (implementation-specific default if `None`).
    async fn set_link(&self, link: &Link, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a cached link. Used when a link is updated or deleted.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Human-readable backend name for health reporting.
    fn backend(&self) -> &'static str;
}
