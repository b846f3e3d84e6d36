//! Port for API token storage.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A stored API token. `token_hash` is the keyed HMAC-SHA256 digest; the raw
/// token is shown once at creation and never stored.
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Backs [`crate::application::services::AuthService`] and the admin CLI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Owner of the unrevoked token with this digest, if any.
    async fn find_active_user(&self, token_hash: &str) -> Result<Option<i64>, AppError>;

    /// Stamps `last_used_at`.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Fails with [`AppError::ConstraintViolation`] (`token_hash`) on a digest clash.
    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError>;

    /// Every token, newest first, revoked ones included.
    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError>;

    /// [`AppError::NotFound`] when no active token has this id.
    async fn revoke_token(&self, id: i64) -> Result<(), AppError>;
}
