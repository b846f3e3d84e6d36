//! `api_tokens` table access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct TokenRecord {
    id: i64,
    user_id: i64,
    name: String,
    token_hash: String,
    created_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl From<TokenRecord> for ApiToken {
    fn from(r: TokenRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            token_hash: r.token_hash,
            created_at: r.created_at,
            revoked_at: r.revoked_at,
        }
    }
}

/// Token store keyed by HMAC digest. Raw tokens never reach the database.
pub struct PgTokenRepository {
    pool: Arc<PgPool>,
}

impl PgTokenRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

const SELECT_TOKENS: &str =
    "SELECT id, user_id, name, token_hash, created_at, revoked_at FROM api_tokens";

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn find_active_user(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        let user_id = sqlx::query_scalar(
            "SELECT user_id FROM api_tokens WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user_id)
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE api_tokens SET last_used_at = NOW() WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let record = sqlx::query_as::<_, TokenRecord>(
            r#"
            INSERT INTO api_tokens (user_id, name, token_hash)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, token_hash, created_at, revoked_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(token_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        tracing::info!(user_id, token_id = record.id, "API token created");
        Ok(record.into())
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let sql = format!("{SELECT_TOKENS} ORDER BY created_at DESC");
        let records = sqlx::query_as::<_, TokenRecord>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(records.into_iter().map(ApiToken::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let sql = format!("{SELECT_TOKENS} WHERE id = $1");
        let record = sqlx::query_as::<_, TokenRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record.map(ApiToken::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let sql = format!("{SELECT_TOKENS} WHERE name = $1 ORDER BY id DESC LIMIT 1");
        let record = sqlx::query_as::<_, TokenRecord>(&sql)
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record.map(ApiToken::from))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let revoked = sqlx::query(
            "UPDATE api_tokens SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?
        .rows_affected();

        if revoked == 0 {
            return Err(AppError::not_found(
                "No active token with this id",
                json!({ "id": id }),
            ));
        }

        tracing::info!(token_id = id, "API token revoked");
        Ok(())
    }
}
