//! Handler for the per-user statistics endpoint.

use axum::{Extension, Json, extract::State};

use crate::api::dto::stats::{LinkStatsItem, StatsResponse};
use crate::domain::entities::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns every link of the caller with its click count.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// # Response
///
/// ```json
/// {
///   "total_links": 1,
///   "total_clicks": 3,
///   "items": [
///     {
///       "id": 1,
///       "original_url": "https://example.com",
///       "short_url": "https://sho.rt/b",
///       "qr_url": "https://sho.rt/artifacts/qr_codes/qr_b.svg",
///       "clicks": 3,
///       "created_at": "2026-01-01T00:00:00Z",
///       "expires_at": "2026-02-01T00:00:00Z"
///     }
///   ]
/// }
/// ```
pub async fn stats_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.user_stats(user.user_id).await?;

    let total_clicks = stats.iter().map(|s| s.clicks).sum();
    let items: Vec<LinkStatsItem> = stats.into_iter().map(LinkStatsItem::from).collect();

    Ok(Json(StatsResponse {
        total_links: items.len(),
        total_clicks,
        items,
    }))
}
