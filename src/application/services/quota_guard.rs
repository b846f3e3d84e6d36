//! Per-user daily creation quota.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use serde_json::json;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Default number of links a user may create per UTC calendar day.
pub const DEFAULT_DAILY_LINK_QUOTA: i64 = 100;

/// Start of the UTC calendar day containing `now`.
pub fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Rejects creation once a user reached the daily ceiling.
pub struct QuotaGuard<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    daily_limit: i64,
}

impl<L: LinkRepository + ?Sized> QuotaGuard<L> {
    pub fn new(repository: Arc<L>, daily_limit: i64) -> Self {
        Self {
            repository,
            daily_limit,
        }
    }

    /// Allows the request if `user_id` created fewer than the limit today.
    ///
    /// # Errors
    ///
    /// - [`AppError::QuotaExceeded`] when the count reached the limit
    /// - [`AppError::Internal`] when the count cannot be obtained; a failed
    ///   check never allows the request
    pub async fn check(&self, user_id: i64) -> Result<(), AppError> {
        self.check_at(user_id, Utc::now()).await
    }

    pub async fn check_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<(), AppError> {
        let since = start_of_utc_day(now);

        let count = self
            .repository
            .count_created_since(user_id, since)
            .await
            .map_err(|e| {
                tracing::error!(user_id, error = %e, "Quota count failed");
                AppError::internal("Failed to check rate limit", json!({}))
            })?;

        if count >= self.daily_limit {
            tracing::info!(user_id, count, limit = self.daily_limit, "Daily quota reached");
            return Err(AppError::quota_exceeded(
                "Daily link creation limit reached",
                json!({ "limit": self.daily_limit, "created_today": count }),
            ));
        }

        Ok(())
    }
}
