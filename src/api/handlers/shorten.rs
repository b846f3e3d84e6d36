//! `POST /api/shorten`.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{
    BatchSummary, ShortenRequest, ShortenResponse, ShortenResultItem, UrlItem,
};
use crate::domain::entities::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Issues a short link for every item of the batch.
///
/// Items run in order and independently; a rejected item is reported next to
/// its URL and the rest of the batch still goes through.
///
/// # Request Body
///
/// ```json
/// {
///   "urls": [
///     { "url": "example.com/page", "expires_at": "2030-01-01T00:00:00Z" }
///   ]
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "summary": { "total": 1, "successful": 1, "failed": 0 },
///   "items": [
///     {
///       "url": "example.com/page",
///       "id": 1,
///       "code": "b",
///       "short_url": "https://sho.rt/b",
///       "qr_url": "https://sho.rt/artifacts/qr_codes/qr_b.svg",
///       "expires_at": "2030-01-01T00:00:00Z",
///       "reused": false
///     }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the batch is empty or larger than 100 items.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let mut items = Vec::with_capacity(payload.urls.len());
    for UrlItem { url, expires_at } in payload.urls {
        let outcome = state
            .link_service
            .issue(user.user_id, &url, expires_at)
            .await;
        items.push(match outcome {
            Ok(issued) => ShortenResultItem::issued(url, issued),
            Err(err) => ShortenResultItem::failed(url, &err),
        });
    }

    let summary = BatchSummary::of(&items);
    tracing::debug!(
        user_id = user.user_id,
        total = summary.total,
        failed = summary.failed,
        "Shorten batch processed"
    );

    Ok(Json(ShortenResponse { summary, items }))
}
