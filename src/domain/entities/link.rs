//! Link entity representing an issued short link.

use chrono::{DateTime, Utc};

/// Lifecycle state of a link row.
///
/// A row is created `Pending` with no code and no artifact, and becomes
/// `Complete` once both are set. Pending rows are never returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Pending,
    Complete,
}

impl LinkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
        }
    }

    /// Maps the stored column value; anything unknown is treated as pending.
    pub fn from_db(value: &str) -> Self {
        match value {
            "complete" => Self::Complete,
            _ => Self::Pending,
        }
    }
}

/// A short link owned by a user.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub user_id: i64,
    pub original_url: String,
    /// Assigned exactly once, after the row exists.
    pub code: Option<String>,
    /// Public URL of the published QR artifact.
    pub artifact_url: Option<String>,
    pub state: LinkState,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link is expired at `now` (`expires_at <= now`).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_complete(&self) -> bool {
        self.state == LinkState::Complete
    }
}

/// Input for the first phase of link creation.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub user_id: i64,
    pub original_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Builds the public short URL for `code`.
pub fn short_url_for(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
