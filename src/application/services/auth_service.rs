//! Authentication service resolving API tokens to users.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::AuthUser;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. Shared with the admin CLI,
/// which must produce the same digest when issuing tokens.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service for authenticating API requests via Bearer tokens.
///
/// An attacker with read-only access to the database cannot verify or forge
/// tokens without the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Resolves a raw token to the user it belongs to.
    ///
    /// On success the token's `last_used` timestamp is refreshed; a failure to do
    /// so is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let Some(user_id) = self.repository.find_active_user(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::debug!(error = %e, "Failed to update token last_used");
        }

        Ok(AuthUser { user_id })
    }
}
