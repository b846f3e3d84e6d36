//! `POST /api/shorten` bodies.

use crate::application::services::IssuedLink;
use crate::error::{AppError, ErrorInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 URLs per request"))]
    pub urls: Vec<UrlItem>,
}

/// One `{ url, expires_at }` pair. The URL is checked during issuance so a bad
/// item fails alone instead of rejecting the whole batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlItem {
    pub url: String,

    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub summary: BatchSummary,
    pub items: Vec<ShortenResultItem>,
}

/// Per-item outcome, in request order. Serialized without a tag: a success
/// carries `code`, a failure carries `error`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShortenResultItem {
    Success {
        url: String,
        id: i64,
        code: String,
        short_url: String,
        qr_url: String,
        expires_at: DateTime<Utc>,
        reused: bool,
    },
    Error {
        url: String,
        error: ErrorInfo,
    },
}

impl ShortenResultItem {
    pub fn issued(url: String, issued: IssuedLink) -> Self {
        Self::Success {
            url,
            id: issued.id,
            code: issued.code,
            short_url: issued.short_url,
            qr_url: issued.artifact_url,
            expires_at: issued.expires_at,
            reused: issued.reused,
        }
    }

    pub fn failed(url: String, err: &AppError) -> Self {
        Self::Error {
            url,
            error: err.to_error_info(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of(items: &[ShortenResultItem]) -> Self {
        let failed = items
            .iter()
            .filter(|item| matches!(item, ShortenResultItem::Error { .. }))
            .count();
        Self {
            total: items.len(),
            successful: items.len() - failed,
            failed,
        }
    }
}
