//! Cache service trait and error types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// What the redirect path needs to answer without touching the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLink {
    pub link_id: i64,
    pub original_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Trait for caching code lookups.
///
/// Implementations must be thread-safe and fail open: a cache failure degrades
/// to a store lookup and never fails the request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached entry for `code`.
    ///
    /// `Ok(None)` on miss, undecodable entry, or backend error.
    async fn get_link(&self, code: &str) -> CacheResult<Option<CachedLink>>;

    /// Stores an entry. `ttl_seconds` is an upper bound on its lifetime; the
    /// implementation may shorten it to its own default.
    async fn set_link(
        &self,
        code: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes the entry for `code`.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
