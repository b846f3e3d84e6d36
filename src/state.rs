//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, RedirectService, StatsService};
use crate::domain::click_worker::ClickDispatcher;
use crate::domain::repositories::{LinkRepository, StatsRepository, TokenRepository};
use crate::infrastructure::artifacts::ArtifactPublisher;
use crate::infrastructure::cache::CacheService;

pub type AppLinkService = LinkService<dyn LinkRepository, dyn ArtifactPublisher>;
pub type AppRedirectService = RedirectService<dyn LinkRepository>;
pub type AppStatsService = StatsService<dyn StatsRepository>;
pub type AppAuthService = AuthService<dyn TokenRepository>;

/// Services are built once at startup over trait objects, so the same router
/// runs against PostgreSQL in production and in-memory ports in tests.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    pub redirect_service: Arc<AppRedirectService>,
    pub stats_service: Arc<AppStatsService>,
    pub auth_service: Arc<AppAuthService>,
    pub cache: Arc<dyn CacheService>,
    pub click_dispatcher: ClickDispatcher,
}
