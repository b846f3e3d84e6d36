//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkState, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, user_id, original_url, code, artifact_url, state, created_at, expires_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    user_id: i64,
    original_url: String,
    code: Option<String>,
    artifact_url: Option<String>,
    state: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            user_id: row.user_id,
            original_url: row.original_url,
            code: row.code,
            artifact_url: row.artifact_url,
            state: LinkState::from_db(&row.state),
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// PostgreSQL repository for link records.
///
/// The `links_code_key` unique constraint is the authority on code uniqueness.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (user_id, original_url, expires_at)
            VALUES ($1, $2, $3)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(new_link.user_id)
        .bind(&new_link.original_url)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE code = $1 AND state = 'complete'
            "#
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_latest_by_user_and_url(
        &self,
        user_id: i64,
        original_url: &str,
    ) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE user_id = $1
              AND original_url = $2
              AND state = 'complete'
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE user_id = $1 AND state = 'complete'
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_created_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM links WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn assign_code(&self, id: i64, code: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET code = $2
            WHERE id = $1 AND code IS NULL
            "#,
        )
        .bind(id)
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Pending link not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    async fn update_code_and_artifact(
        &self,
        id: i64,
        code: &str,
        artifact_url: &str,
    ) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links
            SET code = $2, artifact_url = $3, state = 'complete'
            WHERE id = $1
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(code)
        .bind(artifact_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    async fn delete_stale_pending(&self, older_than: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE state = 'pending' AND created_at < $1")
            .bind(older_than)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
