//! Link issuance and management.
//!
//! Issuance runs validate, expiry check, quota, dedup, then a two-phase create:
//! a pending row is inserted, its code assigned, the QR artifact published under
//! that code, and finally code and artifact are written together and the row is
//! marked complete. A failure after the insert leaves a pending row behind for
//! the admin sweep; pending rows are invisible to every read path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::application::services::quota_guard::QuotaGuard;
use crate::domain::entities::{Link, NewLink, short_url_for};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::artifacts::ArtifactPublisher;
use crate::utils::code_generator::{CodeSource, CodeStrategy, OsCodeSource, encode_base62};
use crate::utils::qr::render_qr_svg;
use crate::utils::url_validator::UrlValidator;

/// Random draws attempted before giving up with [`AppError::CollisionExhausted`].
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Folder artifacts are published under.
const ARTIFACT_FOLDER: &str = "qr_codes";

/// Deployment-level settings for [`LinkService`].
#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub public_base_url: String,
    pub code_strategy: CodeStrategy,
    pub daily_quota: i64,
    pub validator: UrlValidator,
}

/// Outcome of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedLink {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub artifact_url: String,
    pub expires_at: DateTime<Utc>,
    /// True when an existing, still-valid link was returned instead of a new one.
    pub reused: bool,
}

/// Service issuing short links and managing a user's own links.
pub struct LinkService<L: LinkRepository + ?Sized, A: ArtifactPublisher + ?Sized> {
    link_repository: Arc<L>,
    artifact_publisher: Arc<A>,
    quota_guard: QuotaGuard<L>,
    validator: UrlValidator,
    code_strategy: CodeStrategy,
    code_source: Arc<dyn CodeSource>,
    public_base_url: String,
}

impl<L, A> LinkService<L, A>
where
    L: LinkRepository + ?Sized,
    A: ArtifactPublisher + ?Sized,
{
    /// Creates a new link service drawing random codes from the OS CSPRNG.
    pub fn new(link_repository: Arc<L>, artifact_publisher: Arc<A>, settings: LinkSettings) -> Self {
        Self {
            quota_guard: QuotaGuard::new(link_repository.clone(), settings.daily_quota),
            link_repository,
            artifact_publisher,
            validator: settings.validator,
            code_strategy: settings.code_strategy,
            code_source: Arc::new(OsCodeSource),
            public_base_url: settings.public_base_url,
        }
    }

    /// Replaces the random code source.
    pub fn with_code_source(mut self, code_source: Arc<dyn CodeSource>) -> Self {
        self.code_source = code_source;
        self
    }

    /// Issues a short link for `original_url`, or reuses a still-valid one.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an unacceptable URL or an expiration not in the future
    /// - [`AppError::QuotaExceeded`] when the daily ceiling is reached
    /// - [`AppError::CollisionExhausted`] when every random draw collided
    /// - [`AppError::Internal`] for store, renderer or publisher failures
    pub async fn issue(
        &self,
        user_id: i64,
        original_url: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedLink, AppError> {
        let target = self.validator.validate(original_url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "url": original_url }))
        })?;

        if expires_at <= Utc::now() {
            return Err(AppError::bad_request(
                "Expiration date must be in the future",
                json!({ "expires_at": expires_at }),
            ));
        }

        self.quota_guard.check(user_id).await?;

        if let Some(existing) = self.find_reusable(user_id, &target).await? {
            if let Some(issued) = self.to_issued(existing, true) {
                tracing::debug!(user_id, code = %issued.code, "Reusing existing link");
                return Ok(issued);
            }
        }

        self.mint(user_id, target, expires_at).await
    }

    /// Most recent complete link of `user_id` for exactly `original_url`, if it
    /// has not expired. An expired match is never reused.
    pub async fn find_reusable(
        &self,
        user_id: i64,
        original_url: &str,
    ) -> Result<Option<Link>, AppError> {
        let now = Utc::now();

        let existing = self
            .link_repository
            .find_latest_by_user_and_url(user_id, original_url)
            .await?;

        Ok(existing.filter(|link| link.is_complete() && !link.is_expired_at(now)))
    }

    async fn mint(
        &self,
        user_id: i64,
        original_url: String,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedLink, AppError> {
        let pending = self
            .link_repository
            .create(NewLink {
                user_id,
                original_url,
                expires_at,
            })
            .await?;

        let code = self.assign_code(pending.id).await?;
        let short_url = short_url_for(&self.public_base_url, &code);

        let svg = render_qr_svg(&short_url).map_err(|e| {
            tracing::error!(link_id = pending.id, error = %e, "QR rendering failed");
            AppError::internal("Failed to generate QR code", json!({ "code": code }))
        })?;

        let key = format!("{ARTIFACT_FOLDER}/qr_{code}.svg");
        let artifact_url = self
            .artifact_publisher
            .publish(&key, svg)
            .await
            .map_err(|e| {
                tracing::error!(link_id = pending.id, error = %e, "Artifact publish failed");
                AppError::internal("Failed to upload QR code", json!({ "code": code }))
            })?;

        let link = self
            .link_repository
            .update_code_and_artifact(pending.id, &code, &artifact_url)
            .await?;

        metrics::counter!("shorty_links_issued_total").increment(1);
        tracing::info!(user_id, link_id = link.id, code = %code, "Short link issued");

        self.to_issued(link, false).ok_or_else(|| {
            AppError::internal("Link left incomplete", json!({ "id": pending.id }))
        })
    }

    /// Gives the pending row `link_id` its code.
    async fn assign_code(&self, link_id: i64) -> Result<String, AppError> {
        match self.code_strategy {
            CodeStrategy::Derived => {
                let value = u64::try_from(link_id).map_err(|_| {
                    AppError::internal("Invalid link id", json!({ "id": link_id }))
                })?;
                let code = encode_base62(value);

                match self.link_repository.assign_code(link_id, &code).await {
                    Ok(()) => Ok(code),
                    Err(AppError::ConstraintViolation { field }) => {
                        tracing::error!(link_id, code = %code, field = %field, "Derived code already taken");
                        Err(AppError::internal(
                            "Derived short code already taken",
                            json!({ "code": code }),
                        ))
                    }
                    Err(e) => Err(e),
                }
            }
            CodeStrategy::Random => self.assign_random_code(link_id).await,
        }
    }

    async fn assign_random_code(&self, link_id: i64) -> Result<String, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.code_source.draw()?;

            match self.link_repository.assign_code(link_id, &code).await {
                Ok(()) => return Ok(code),
                Err(AppError::ConstraintViolation { field }) if field == "code" => {
                    tracing::debug!(link_id, attempt, code = %code, "Short code collision, redrawing");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(link_id, attempts = MAX_CODE_ATTEMPTS, "Short code collisions exhausted");
        Err(AppError::collision_exhausted(
            "Failed to generate a unique short code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Complete links of `user_id`, newest first.
    pub async fn list_links(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_by_user(user_id).await
    }

    /// One complete link owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the link does not exist, is pending,
    /// or belongs to someone else.
    pub async fn get_link(&self, user_id: i64, link_id: i64) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(link_id)
            .await?
            .filter(|link| link.user_id == user_id && link.is_complete())
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": link_id })))
    }

    /// Deletes a link owned by `user_id` together with its clicks and returns it.
    pub async fn delete_link(&self, user_id: i64, link_id: i64) -> Result<Link, AppError> {
        let link = self.get_link(user_id, link_id).await?;

        if !self.link_repository.delete_by_id(link.id).await? {
            return Err(AppError::not_found("Link not found", json!({ "id": link_id })));
        }

        tracing::info!(user_id, link_id, "Link deleted");
        Ok(link)
    }

    /// Public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        short_url_for(&self.public_base_url, code)
    }

    /// Checks database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.link_repository.health_check().await
    }

    fn to_issued(&self, link: Link, reused: bool) -> Option<IssuedLink> {
        let code = link.code?;
        let artifact_url = link.artifact_url?;

        Some(IssuedLink {
            id: link.id,
            short_url: short_url_for(&self.public_base_url, &code),
            code,
            artifact_url,
            expires_at: link.expires_at,
            reused,
        })
    }
}
