#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration as StdDuration;
use tokio::sync::mpsc;

use shorty::application::services::auth_service::hash_token;
use shorty::application::services::{
    AuthService, LinkService, LinkSettings, RedirectService, StatsService,
};
use shorty::domain::click_event::ClickEvent;
use shorty::domain::click_worker::ClickDispatcher;
use shorty::domain::entities::{Link, LinkState, NewLink};
use shorty::domain::repositories::{
    ApiToken, LinkRepository, LinkStats, StatsRepository, TokenRepository,
};
use shorty::error::AppError;
use shorty::infrastructure::artifacts::{ArtifactError, ArtifactPublisher};
use shorty::infrastructure::cache::{CacheService, NullCache};
use shorty::state::AppState;
use shorty::utils::code_generator::CodeStrategy;
use shorty::utils::url_validator::UrlValidator;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://sho.rt";
pub const ARTIFACT_BASE_URL: &str = "https://sho.rt/artifacts";

#[derive(Default)]
struct Tables {
    links: Vec<Link>,
    /// `(link_id, clicked_at)`
    clicks: Vec<(i64, DateTime<Utc>)>,
    tokens: Vec<(ApiToken, Option<DateTime<Utc>>)>,
    next_link_id: i64,
    next_token_id: i64,
    unavailable: bool,
}

/// In-memory store implementing every repository port.
///
/// Mirrors the database constraints the services rely on: unique codes,
/// pending rows hidden from readers and click rows cascading with their link.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.lock().unavailable {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(())
    }

    /// Makes every subsequent call fail like a lost connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Inserts a finished link directly, bypassing issuance.
    pub fn insert_complete_link(
        &self,
        user_id: i64,
        original_url: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Link {
        let mut tables = self.lock();
        tables.next_link_id += 1;
        let link = Link {
            id: tables.next_link_id,
            user_id,
            original_url: original_url.to_string(),
            code: Some(code.to_string()),
            artifact_url: Some(format!("{ARTIFACT_BASE_URL}/qr_codes/qr_{code}.svg")),
            state: LinkState::Complete,
            created_at: Utc::now(),
            expires_at,
        };
        tables.links.push(link.clone());
        link
    }

    /// Registers a token for `user_id` and returns it for use in a Bearer header.
    pub fn add_token(&self, user_id: i64, raw_token: &str) -> String {
        let mut tables = self.lock();
        tables.next_token_id += 1;
        let token = ApiToken {
            id: tables.next_token_id,
            user_id,
            name: format!("token-{}", tables.next_token_id),
            token_hash: hash_token(SIGNING_SECRET, raw_token),
            created_at: Utc::now(),
            revoked_at: None,
        };
        tables.tokens.push((token, None));
        raw_token.to_string()
    }

    pub fn link(&self, id: i64) -> Option<Link> {
        self.lock().links.iter().find(|l| l.id == id).cloned()
    }

    pub fn links(&self) -> Vec<Link> {
        self.lock().links.clone()
    }

    pub fn click_rows(&self, link_id: i64) -> usize {
        self.lock()
            .clicks
            .iter()
            .filter(|(id, _)| *id == link_id)
            .count()
    }

    pub fn total_click_rows(&self) -> usize {
        self.lock().clicks.len()
    }
}

fn code_taken(tables: &Tables, code: &str, except_id: i64) -> bool {
    tables
        .links
        .iter()
        .any(|l| l.id != except_id && l.code.as_deref() == Some(code))
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check_available()?;
        let mut tables = self.lock();
        tables.next_link_id += 1;
        let link = Link {
            id: tables.next_link_id,
            user_id: new_link.user_id,
            original_url: new_link.original_url,
            code: None,
            artifact_url: None,
            state: LinkState::Pending,
            created_at: Utc::now(),
            expires_at: new_link.expires_at,
        };
        tables.links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.check_available()?;
        Ok(self
            .lock()
            .links
            .iter()
            .find(|l| l.is_complete() && l.code.as_deref() == Some(code))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        self.check_available()?;
        Ok(self.link(id))
    }

    async fn find_latest_by_user_and_url(
        &self,
        user_id: i64,
        original_url: &str,
    ) -> Result<Option<Link>, AppError> {
        self.check_available()?;
        Ok(self
            .lock()
            .links
            .iter()
            .filter(|l| l.is_complete() && l.user_id == user_id && l.original_url == original_url)
            .max_by_key(|l| (l.created_at, l.id))
            .cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        self.check_available()?;
        let mut links: Vec<Link> = self
            .lock()
            .links
            .iter()
            .filter(|l| l.is_complete() && l.user_id == user_id)
            .cloned()
            .collect();
        links.sort_by_key(|l| std::cmp::Reverse((l.created_at, l.id)));
        Ok(links)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        self.check_available()?;
        let mut tables = self.lock();
        let before = tables.links.len();
        tables.links.retain(|l| l.id != id);
        tables.clicks.retain(|(link_id, _)| *link_id != id);
        Ok(tables.links.len() < before)
    }

    async fn count_created_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        self.check_available()?;
        Ok(self
            .lock()
            .links
            .iter()
            .filter(|l| l.user_id == user_id && l.created_at >= since)
            .count() as i64)
    }

    async fn assign_code(&self, id: i64, code: &str) -> Result<(), AppError> {
        self.check_available()?;
        let mut tables = self.lock();
        if code_taken(&tables, code, id) {
            return Err(AppError::constraint_violation("code"));
        }
        let link = tables
            .links
            .iter_mut()
            .find(|l| l.id == id && l.code.is_none())
            .ok_or_else(|| AppError::not_found("Pending link not found", json!({ "id": id })))?;
        link.code = Some(code.to_string());
        Ok(())
    }

    async fn update_code_and_artifact(
        &self,
        id: i64,
        code: &str,
        artifact_url: &str,
    ) -> Result<Link, AppError> {
        self.check_available()?;
        let mut tables = self.lock();
        if code_taken(&tables, code, id) {
            return Err(AppError::constraint_violation("code"));
        }
        let link = tables
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;
        link.code = Some(code.to_string());
        link.artifact_url = Some(artifact_url.to_string());
        link.state = LinkState::Complete;
        Ok(link.clone())
    }

    async fn delete_stale_pending(&self, older_than: DateTime<Utc>) -> Result<u64, AppError> {
        self.check_available()?;
        let mut tables = self.lock();
        let before = tables.links.len();
        tables
            .links
            .retain(|l| l.is_complete() || l.created_at >= older_than);
        Ok((before - tables.links.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

#[async_trait]
impl StatsRepository for MemoryStore {
    async fn record_click(&self, link_id: i64) -> Result<(), AppError> {
        self.check_available()?;
        let mut tables = self.lock();
        if !tables.links.iter().any(|l| l.id == link_id) {
            return Err(AppError::internal(
                "Database error",
                json!({ "reason": "foreign key violation" }),
            ));
        }
        tables.clicks.push((link_id, Utc::now()));
        Ok(())
    }

    async fn count_clicks(&self, link_id: i64) -> Result<i64, AppError> {
        self.check_available()?;
        Ok(self.click_rows(link_id) as i64)
    }

    async fn user_link_stats(&self, user_id: i64) -> Result<Vec<LinkStats>, AppError> {
        let links = self.list_by_user(user_id).await?;
        Ok(links
            .into_iter()
            .map(|l| LinkStats {
                link_id: l.id,
                clicks: self.click_rows(l.id) as i64,
                original_url: l.original_url,
                code: l.code.unwrap_or_default(),
                artifact_url: l.artifact_url,
                created_at: l.created_at,
                expires_at: l.expires_at,
            })
            .collect())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn find_active_user(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        self.check_available()?;
        Ok(self
            .lock()
            .tokens
            .iter()
            .find(|(t, _)| t.token_hash == token_hash && t.revoked_at.is_none())
            .map(|(t, _)| t.user_id))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        self.check_available()?;
        let mut tables = self.lock();
        if let Some((_, last_used)) = tables
            .tokens
            .iter_mut()
            .find(|(t, _)| t.token_hash == token_hash)
        {
            *last_used = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        self.check_available()?;
        let mut tables = self.lock();
        if tables.tokens.iter().any(|(t, _)| t.token_hash == token_hash) {
            return Err(AppError::constraint_violation("token_hash"));
        }
        tables.next_token_id += 1;
        let token = ApiToken {
            id: tables.next_token_id,
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            revoked_at: None,
        };
        tables.tokens.push((token.clone(), None));
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        self.check_available()?;
        Ok(self.lock().tokens.iter().map(|(t, _)| t.clone()).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        self.check_available()?;
        Ok(self
            .lock()
            .tokens
            .iter()
            .find(|(t, _)| t.id == id)
            .map(|(t, _)| t.clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        self.check_available()?;
        Ok(self
            .lock()
            .tokens
            .iter()
            .rev()
            .find(|(t, _)| t.name == name)
            .map(|(t, _)| t.clone()))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        self.check_available()?;
        let mut tables = self.lock();
        let (token, _) = tables
            .tokens
            .iter_mut()
            .find(|(t, _)| t.id == id && t.revoked_at.is_none())
            .ok_or_else(|| AppError::not_found("Active token not found", json!({ "id": id })))?;
        token.revoked_at = Some(Utc::now());
        Ok(())
    }
}

/// Artifact publisher that keeps payloads in memory.
#[derive(Default)]
pub struct MemoryArtifactPublisher {
    published: Mutex<Vec<(String, Vec<u8>)>>,
    failing: Mutex<bool>,
}

impl MemoryArtifactPublisher {
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactPublisher for MemoryArtifactPublisher {
    async fn publish(&self, key: &str, payload: Vec<u8>) -> Result<String, ArtifactError> {
        if *self.failing.lock().unwrap() {
            return Err(ArtifactError::Storage("disk full".to_string()));
        }
        self.published
            .lock()
            .unwrap()
            .push((key.to_string(), payload));
        Ok(format!("{ARTIFACT_BASE_URL}/{key}"))
    }
}

/// Wired application state over in-memory ports.
pub struct TestApp {
    pub state: AppState,
    pub store: MemoryStore,
    pub artifacts: Arc<MemoryArtifactPublisher>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn link_settings() -> LinkSettings {
    LinkSettings {
        public_base_url: BASE_URL.to_string(),
        code_strategy: CodeStrategy::Derived,
        daily_quota: 100,
        validator: UrlValidator::default(),
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(link_settings())
}

pub fn create_test_app_with(settings: LinkSettings) -> TestApp {
    let store = MemoryStore::default();
    let artifacts = Arc::new(MemoryArtifactPublisher::default());
    let cache: Arc<dyn CacheService> = Arc::new(NullCache::new());
    let (click_dispatcher, clicks) = ClickDispatcher::channel(100);

    let link_repo: Arc<dyn LinkRepository> = Arc::new(store.clone());
    let stats_repo: Arc<dyn StatsRepository> = Arc::new(store.clone());
    let token_repo: Arc<dyn TokenRepository> = Arc::new(store.clone());
    let publisher: Arc<dyn ArtifactPublisher> = artifacts.clone();

    let state = AppState {
        link_service: Arc::new(LinkService::new(link_repo.clone(), publisher, settings)),
        redirect_service: Arc::new(RedirectService::new(
            link_repo,
            cache.clone(),
            click_dispatcher.clone(),
        )),
        stats_service: Arc::new(StatsService::new(stats_repo, BASE_URL.to_string())),
        auth_service: Arc::new(AuthService::new(token_repo, SIGNING_SECRET.to_string())),
        cache,
        click_dispatcher,
    };

    TestApp {
        state,
        store,
        artifacts,
        clicks,
    }
}

pub fn in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// Polls `condition` until it holds or a second has passed.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    condition()
}

/// Inserts a user row and returns its id.
pub async fn create_test_user(pool: &sqlx::PgPool, username: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}
