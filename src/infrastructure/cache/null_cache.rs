//! Cache backend that stores nothing.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;
use tracing::debug;

/// Always-miss cache.
///
/// Selected when no Redis URL is configured or Redis refused the startup
/// connection. Every redirect then reads the links table directly.
#[derive(Debug, Clone, Copy)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Link cache disabled, lookups go to the database");
        NullCache
    }
}

impl Default for NullCache {
    fn default() -> Self {
        NullCache::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_link(&self, _: &str) -> CacheResult<Option<Link>> {
        Ok(None)
    }

    async fn set_link(&self, _: &Link, _: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _: &str) -> CacheResult<()> {
        Ok(())
    }

    // Nothing to reach, so never unhealthy.
    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}
