//! API route configuration.
//!
//! Everything returned by [`protected_routes`] requires Bearer token
//! authentication via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    delete_link_handler, get_link_handler, health_handler, list_links_handler, shorten_handler,
    stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// API routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /shorten`     - Issue short links (batch-capable)
/// - `GET    /stats`       - Click statistics of the caller's links
/// - `GET    /links`       - The caller's links
/// - `GET    /links/{id}`  - One link with its click count
/// - `DELETE /links/{id}`  - Delete a link and its clicks
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats", get(stats_handler))
        .route("/links", get(list_links_handler))
        .route(
            "/links/{id}",
            get(get_link_handler).delete(delete_link_handler),
        )
}

/// API routes reachable without a token.
///
/// - `GET /health` - Component health
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
