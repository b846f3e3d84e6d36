//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`       - Short link redirect (public)
//! - `GET  /api/health`   - Health check: DB, cache, click queue (public)
//! - `/api/*`             - REST API (Bearer token required)
//! - `/artifacts/*`       - Published QR images
//!
//! Health lives under `/api` so it can never shadow a short code.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token
//! - **Path normalization** - Trailing slash handling

use std::path::Path;

use crate::api;
use crate::api::handlers::redirect_handler;
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `artifact_dir` - directory served under `/artifacts`
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(
    state: AppState,
    artifact_dir: &Path,
    behind_proxy: bool,
) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, artifact_dir, behind_proxy))
}

/// Builds the routed application without path normalization.
///
/// `NormalizePath` has to wrap the whole router, so it cannot be a router layer.
pub fn build_router(state: AppState, artifact_dir: &Path, behind_proxy: bool) -> Router {
    let protected = api::routes::protected_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_token,
    ));
    let protected = with_rate_limit(protected, rate_limit::SECURE, behind_proxy);

    let api_router = Router::new()
        .merge(protected)
        .merge(api::routes::public_routes());

    let redirects = with_rate_limit(
        Router::new().route("/{code}", get(redirect_handler)),
        rate_limit::PUBLIC,
        behind_proxy,
    );

    Router::new()
        .nest("/api", api_router)
        .merge(redirects)
        .nest_service("/artifacts", ServeDir::new(artifact_dir))
        .with_state(state)
        .layer(tracing::layer())
}

fn with_rate_limit(
    router: Router<AppState>,
    limit: RateLimit,
    behind_proxy: bool,
) -> Router<AppState> {
    if behind_proxy {
        router.layer(rate_limit::layer(SmartIpKeyExtractor, limit))
    } else {
        router.layer(rate_limit::layer(PeerIpKeyExtractor, limit))
    }
}
