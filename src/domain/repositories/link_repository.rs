//! Persistence port for links.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for link records.
///
/// Uniqueness violations surface as [`AppError::ConstraintViolation`] carrying the
/// offending field (`code` for short codes), so callers never inspect messages.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a pending row with no code and no artifact.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a complete link by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by id, in any state.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Most recent complete link of `user_id` whose original URL equals `original_url`.
    ///
    /// Expiry is not filtered here; the caller decides reusability.
    async fn find_latest_by_user_and_url(
        &self,
        user_id: i64,
        original_url: &str,
    ) -> Result<Option<Link>, AppError>;

    /// Complete links of a user, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Link>, AppError>;

    /// Deletes a link and, by cascade, its click records.
    ///
    /// Returns `Ok(false)` if no row matched.
    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError>;

    /// Number of links (in any state) `user_id` created at or after `since`.
    async fn count_created_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    /// Sets the short code of a pending row.
    ///
    /// # Errors
    ///
    /// - [`AppError::ConstraintViolation`] with field `code` if the code is taken
    /// - [`AppError::NotFound`] if the row does not exist or already has a code
    async fn assign_code(&self, id: i64, code: &str) -> Result<(), AppError>;

    /// Writes the final code and artifact URL and marks the row complete.
    ///
    /// # Errors
    ///
    /// - [`AppError::ConstraintViolation`] if the code is taken by another row
    /// - [`AppError::NotFound`] if the row does not exist
    async fn update_code_and_artifact(
        &self,
        id: i64,
        code: &str,
        artifact_url: &str,
    ) -> Result<Link, AppError>;

    /// Deletes pending rows created before `older_than`, returning how many were removed.
    async fn delete_stale_pending(&self, older_than: DateTime<Utc>) -> Result<u64, AppError>;

    /// Round-trips the store.
    async fn health_check(&self) -> Result<(), AppError>;
}
