//! Short code resolution for redirects.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::ClickDispatcher;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedLink};

/// Resolves short codes to their targets and dispatches click accounting.
///
/// The cache is consulted first; expiry is rechecked on every hit, so a cached
/// entry never outlives its link.
pub struct RedirectService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
    clicks: ClickDispatcher,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    pub fn new(
        link_repository: Arc<L>,
        cache: Arc<dyn CacheService>,
        clicks: ClickDispatcher,
    ) -> Self {
        Self {
            link_repository,
            cache,
            clicks,
        }
    }

    /// Returns the original URL for `code`.
    ///
    /// A click is dispatched only on success, and dispatch never blocks.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for unknown codes and for store failures
    /// - [`AppError::Expired`] when `expires_at <= now`
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let link = self.lookup(code).await?;

        if link.expires_at <= now {
            return Err(AppError::expired(
                "Short link has expired",
                json!({ "code": code }),
            ));
        }

        self.clicks.dispatch(ClickEvent::new(link.link_id, code));

        Ok(link.original_url)
    }

    async fn lookup(&self, code: &str) -> Result<CachedLink, AppError> {
        if let Ok(Some(cached)) = self.cache.get_link(code).await {
            return Ok(cached);
        }

        let link = match self.link_repository.find_by_code(code).await {
            Ok(Some(link)) => link,
            Ok(None) => return Err(not_found(code)),
            Err(e) => {
                tracing::warn!(code, error = %e, "Store lookup failed during redirect");
                return Err(not_found(code));
            }
        };

        let cached = CachedLink {
            link_id: link.id,
            original_url: link.original_url,
            expires_at: link.expires_at,
        };

        if let Some(ttl) = seconds_until(cached.expires_at, Utc::now()) {
            if let Err(e) = self.cache.set_link(code, &cached, Some(ttl)).await {
                tracing::debug!(code, error = %e, "Cache write failed");
            }
        }

        Ok(cached)
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

/// Whole seconds until `expires_at`, or `None` if it already passed.
fn seconds_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<u64> {
    let seconds = (expires_at - now).num_seconds();
    (seconds > 0).then_some(seconds as u64)
}
