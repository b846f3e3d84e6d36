//! Redirect cache on Redis.

use super::service::{CacheError, CacheResult, CacheService, CachedLink};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

const KEY_PREFIX: &str = "shorty:link:";

/// Holds JSON-encoded [`CachedLink`] values under `shorty:link:<code>`.
///
/// Only [`RedisCache::connect`] can fail. Once connected, backend errors are
/// logged and reported as a miss or a no-op.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    max_ttl: u64,
}

impl RedisCache {
    /// Opens a managed connection and verifies it with `PING`.
    ///
    /// `max_ttl_seconds` caps the lifetime of every entry.
    pub async fn connect(redis_url: &str, max_ttl_seconds: u64) -> CacheResult<Self> {
        let client =
            Client::open(redis_url).map_err(|e| CacheError::ConnectionError(e.to_string()))?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;
        conn.ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("PING failed: {e}")))?;

        tracing::info!(max_ttl_seconds, "Redis cache connected");
        Ok(Self {
            conn,
            max_ttl: max_ttl_seconds,
        })
    }
}

fn key(code: &str) -> String {
    format!("{KEY_PREFIX}{code}")
}

/// Lifetime of a new entry: the requested bound capped at `max_ttl`, never zero.
fn entry_ttl(requested: Option<u64>, max_ttl: u64) -> u64 {
    requested.unwrap_or(max_ttl).min(max_ttl).max(1)
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, code: &str) -> CacheResult<Option<CachedLink>> {
        let raw: Option<String> = match self.conn.clone().get(key(code)).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(code, error = %e, "Redis GET failed");
                return Ok(None);
            }
        };

        let Some(raw) = raw else {
            tracing::trace!(code, "Cache miss");
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(link) => Ok(Some(link)),
            Err(e) => {
                tracing::warn!(code, error = %e, "Discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        code: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let payload =
            serde_json::to_string(link).map_err(|e| CacheError::OperationError(e.to_string()))?;
        let ttl = entry_ttl(ttl_seconds, self.max_ttl);

        if let Err(e) = self
            .conn
            .clone()
            .set_ex::<_, _, ()>(key(code), payload, ttl)
            .await
        {
            tracing::warn!(code, error = %e, "Redis SETEX failed");
        }
        Ok(())
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        if let Err(e) = self.conn.clone().del::<_, ()>(key(code)).await {
            tracing::warn!(code, error = %e, "Redis DEL failed");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.conn.clone().ping::<()>().await.is_ok()
    }
}
