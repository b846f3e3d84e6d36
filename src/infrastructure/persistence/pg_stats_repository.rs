//! PostgreSQL implementation of the counter port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{LinkStats, StatsRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct LinkStatsRow {
    link_id: i64,
    original_url: String,
    code: String,
    artifact_url: Option<String>,
    clicks: i64,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<LinkStatsRow> for LinkStats {
    fn from(row: LinkStatsRow) -> Self {
        LinkStats {
            link_id: row.link_id,
            original_url: row.original_url,
            code: row.code,
            artifact_url: row.artifact_url,
            clicks: row.clicks,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// PostgreSQL repository for click accounting.
///
/// Clicks are append-only rows in `link_clicks`; counts are aggregated on read.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn record_click(&self, link_id: i64) -> Result<(), AppError> {
        sqlx::query("INSERT INTO link_clicks (link_id) VALUES ($1)")
            .bind(link_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn count_clicks(&self, link_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM link_clicks WHERE link_id = $1")
                .bind(link_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn user_link_stats(&self, user_id: i64) -> Result<Vec<LinkStats>, AppError> {
        let rows = sqlx::query_as::<_, LinkStatsRow>(
            r#"
            SELECT
                l.id AS link_id,
                l.original_url,
                COALESCE(l.code, '') AS code,
                l.artifact_url,
                COUNT(c.id) AS clicks,
                l.created_at,
                l.expires_at
            FROM links l
            LEFT JOIN link_clicks c ON c.link_id = l.id
            WHERE l.user_id = $1 AND l.state = 'complete'
            GROUP BY l.id
            ORDER BY l.created_at DESC, l.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(LinkStats::from).collect())
    }
}
