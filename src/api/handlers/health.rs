//! `GET /api/health`.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::health::{ComponentHealth, Components, HealthReport};
use crate::state::AppState;

/// Probes the store, the click queue and the cache.
///
/// `200` when every probe is up, `503` with the same body otherwise.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let components = Components {
        database: probe_store(&state).await,
        click_queue: probe_click_queue(&state),
        cache: probe_cache(&state).await,
    };

    let healthy = components.all_up();
    if !healthy {
        tracing::warn!(?components, "Health probe degraded");
    }

    let report = HealthReport {
        status: if healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        components,
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report)).into_response()
}

async fn probe_store(state: &AppState) -> ComponentHealth {
    match state.link_service.health_check().await {
        Ok(()) => ComponentHealth::up("reachable"),
        Err(e) => ComponentHealth::down(e.to_string()),
    }
}

fn probe_click_queue(state: &AppState) -> ComponentHealth {
    let clicks = &state.click_dispatcher;
    if clicks.is_closed() {
        return ComponentHealth::down("worker stopped");
    }
    ComponentHealth::up(format!(
        "{} of {} slots free",
        clicks.capacity(),
        clicks.max_capacity()
    ))
}

async fn probe_cache(state: &AppState) -> ComponentHealth {
    match state.cache.health_check().await {
        true => ComponentHealth::up("reachable"),
        false => ComponentHealth::down("ping failed"),
    }
}
