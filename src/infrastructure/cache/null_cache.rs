//! Cache that never holds anything.

use super::service::{CacheResult, CacheService, CachedLink};
use async_trait::async_trait;

/// Stands in when `REDIS_URL` is unset or Redis is unreachable at startup.
/// Every lookup misses, so redirects always go to the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl NullCache {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_link(&self, _: &str) -> CacheResult<Option<CachedLink>> {
        Ok(None)
    }

    async fn set_link(&self, _: &str, _: &CachedLink, _: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
