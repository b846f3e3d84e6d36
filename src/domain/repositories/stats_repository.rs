//! Counter port for click accounting and per-user statistics.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One row of a user's dashboard: a complete link and its click total.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub link_id: i64,
    pub original_url: String,
    pub code: String,
    pub artifact_url: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Click counter. Written by the click worker, read by the stats endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Appends one click for `link_id`, timestamped by the store.
    ///
    /// Fails if the link was deleted after its redirect; the worker drops such
    /// clicks.
    async fn record_click(&self, link_id: i64) -> Result<(), AppError>;

    /// Total clicks recorded for `link_id`.
    async fn count_clicks(&self, link_id: i64) -> Result<i64, AppError>;

    /// Complete links of `user_id` with click counts, newest first.
    ///
    /// Links without clicks report zero.
    async fn user_link_stats(&self, user_id: i64) -> Result<Vec<LinkStats>, AppError>;
}
