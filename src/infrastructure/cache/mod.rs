//! Short-code lookup cache used by the redirect path.
//!
//! [`LinkService`](crate::application::services::LinkService) only sees the
//! [`CacheService`] trait. At startup the server picks [`RedisCache`] when
//! `REDIS_URL` is set and reachable, and [`NullCache`] otherwise.

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
