//! HTTP server initialization and runtime setup.
//!
//! Wires the connection pool, cache, artifact store, click worker and services
//! into [`AppState`], then runs the Axum server until Ctrl-C.

use crate::application::services::{AuthService, LinkService, RedirectService, StatsService};
use crate::config::Config;
use crate::domain::click_worker::{ClickDispatcher, run_click_worker};
use crate::domain::repositories::{LinkRepository, StatsRepository, TokenRepository};
use crate::infrastructure::artifacts::{ArtifactPublisher, LocalArtifactStore};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{PgLinkRepository, PgStatsRepository, PgTokenRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Artifact directory
/// - Background click worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The artifact directory cannot be created
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let cache = connect_cache(&config).await;

    tokio::fs::create_dir_all(&config.artifact_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create artifact directory {}",
                config.artifact_dir.display()
            )
        })?;
    let artifacts: Arc<dyn ArtifactPublisher> = Arc::new(LocalArtifactStore::new(
        config.artifact_dir.clone(),
        config.artifact_base_url.clone(),
    ));

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> =
        Arc::new(PgLinkRepository::new(pool.clone()));
    let stats_repository: Arc<dyn StatsRepository> =
        Arc::new(PgStatsRepository::new(pool.clone()));
    let token_repository: Arc<dyn TokenRepository> = Arc::new(PgTokenRepository::new(pool));

    let (click_dispatcher, click_rx) = ClickDispatcher::channel(config.click_queue_capacity);
    let click_worker = tokio::spawn(run_click_worker(
        click_rx,
        stats_repository.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!("Click worker started");

    let state = AppState {
        link_service: Arc::new(LinkService::new(
            link_repository.clone(),
            artifacts,
            config.link_settings(),
        )),
        redirect_service: Arc::new(RedirectService::new(
            link_repository,
            cache.clone(),
            click_dispatcher.clone(),
        )),
        stats_service: Arc::new(StatsService::new(
            stats_repository,
            config.public_base_url.clone(),
        )),
        auth_service: Arc::new(AuthService::new(
            token_repository,
            config.token_signing_secret.clone(),
        )),
        cache,
        click_dispatcher,
    };

    let app = app_router(state, &config.artifact_dir, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it every dispatcher clone) is gone, so the queue
    // closes and the worker drains what is left.
    if let Err(e) = click_worker.await {
        tracing::error!(error = %e, "Click worker terminated abnormally");
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
