//! Bearer token gate for the `/api` routes that act on a user's links.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

type BearerRejection = <AuthBearer as FromRequestParts<AppState>>::Rejection;

/// Resolves `Authorization: Bearer <token>` to an [`crate::domain::entities::AuthUser`]
/// and stores it in the request extensions.
///
/// A missing header, a malformed one, and an unknown or revoked token all
/// answer `401` with `WWW-Authenticate: Bearer`.
pub async fn require_token(
    State(state): State<AppState>,
    bearer: Result<AuthBearer, BearerRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let AuthBearer(token) = bearer.map_err(|_| {
        tracing::debug!("Rejected request without usable bearer token");
        AppError::unauthorized("Unauthorized", json!({ "reason": "missing bearer token" }))
    })?;

    let user = state.auth_service.authenticate(&token).await?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
