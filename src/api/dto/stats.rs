//! DTOs for the per-user statistics endpoint.

use crate::application::services::UserLinkStats;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Click statistics for one link.
#[derive(Debug, Serialize)]
pub struct LinkStatsItem {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub qr_url: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<UserLinkStats> for LinkStatsItem {
    fn from(stats: UserLinkStats) -> Self {
        Self {
            id: stats.id,
            original_url: stats.original_url,
            short_url: stats.short_url,
            qr_url: stats.artifact_url,
            clicks: stats.clicks,
            created_at: stats.created_at,
            expires_at: stats.expires_at,
        }
    }
}

/// The caller's dashboard, newest link first.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_links: usize,
    pub total_clicks: i64,
    pub items: Vec<LinkStatsItem>,
}
