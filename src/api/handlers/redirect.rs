//! `GET /{code}`: the public face of every issued link.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Answers `302 Found` with the stored target in `Location`.
///
/// Unknown, pending and expired codes all answer `404`. Click accounting is
/// queued by the resolver and never delays the response.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let target = state.redirect_service.resolve(&code).await?;

    Ok(found(&target))
}

fn found(target: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, target.to_string())]).into_response()
}
