//! DTOs for link management endpoints.

use crate::domain::entities::Link;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A complete link as shown to its owner.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub original_url: String,
    pub code: String,
    pub short_url: String,
    pub qr_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,

    /// Present on single-link lookups only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<i64>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String, clicks: Option<i64>) -> Self {
        let expired = link.is_expired();
        Self {
            id: link.id,
            original_url: link.original_url,
            code: link.code.unwrap_or_default(),
            short_url,
            qr_url: link.artifact_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            expired,
            clicks,
        }
    }
}

/// All links of the caller.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}
