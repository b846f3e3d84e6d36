//! Per-user click statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::short_url_for;
use crate::domain::repositories::{LinkStats, StatsRepository};
use crate::error::AppError;

/// One dashboard row, with the public short URL resolved.
#[derive(Debug, Clone)]
pub struct UserLinkStats {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub artifact_url: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Service for retrieving click statistics.
pub struct StatsService<R: StatsRepository + ?Sized> {
    repository: Arc<R>,
    public_base_url: String,
}

impl<R: StatsRepository + ?Sized> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>, public_base_url: String) -> Self {
        Self {
            repository,
            public_base_url,
        }
    }

    /// Returns every complete link of `user_id` with its click count, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn user_stats(&self, user_id: i64) -> Result<Vec<UserLinkStats>, AppError> {
        let rows = self.repository.user_link_stats(user_id).await?;

        Ok(rows.into_iter().map(|row| self.to_user_stats(row)).collect())
    }

    /// Total clicks recorded for one link.
    pub async fn count_clicks(&self, link_id: i64) -> Result<i64, AppError> {
        self.repository.count_clicks(link_id).await
    }

    fn to_user_stats(&self, row: LinkStats) -> UserLinkStats {
        UserLinkStats {
            id: row.link_id,
            short_url: short_url_for(&self.public_base_url, &row.code),
            original_url: row.original_url,
            artifact_url: row.artifact_url,
            clicks: row.clicks,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}
