//! Handlers for managing the caller's own links.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::links::{LinkListResponse, LinkResponse};
use crate::domain::entities::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links(user.user_id).await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| {
            let short_url = state
                .link_service
                .short_url(link.code.as_deref().unwrap_or_default());
            LinkResponse::from_link(link, short_url, None)
        })
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Returns one of the caller's links with its click count.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found for unknown ids and for links owned by other users.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(user.user_id, id).await?;
    let clicks = state.stats_service.count_clicks(link.id).await?;
    let short_url = state
        .link_service
        .short_url(link.code.as_deref().unwrap_or_default());

    Ok(Json(LinkResponse::from_link(link, short_url, Some(clicks))))
}

/// Deletes one of the caller's links and its click history.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// Returns `204 No Content`. The redirect cache entry is invalidated, so the
/// code stops resolving immediately.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let link = state.link_service.delete_link(user.user_id, id).await?;

    if let Some(code) = link.code.as_deref() {
        if let Err(e) = state.cache.invalidate(code).await {
            tracing::warn!(code, error = %e, "Failed to invalidate cache");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
