//! PostgreSQL click counter tests. `#[sqlx::test]` creates a fresh database per
//! test from `DATABASE_URL` and applies `migrations/`.

mod common;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use shorty::domain::entities::NewLink;
use shorty::domain::repositories::{LinkRepository, StatsRepository};
use shorty::infrastructure::persistence::{PgLinkRepository, PgStatsRepository};

async fn complete_link(pool: &PgPool, user_id: i64, code: &str) -> i64 {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));
    let link = repo
        .create(NewLink {
            user_id,
            original_url: format!("https://example.com/{code}"),
            expires_at: Utc::now() + Duration::days(1),
        })
        .await
        .unwrap();
    repo.assign_code(link.id, code).await.unwrap();
    repo.update_code_and_artifact(link.id, code, "https://cdn/qr.svg")
        .await
        .unwrap();
    link.id
}

#[sqlx::test]
async fn test_record_and_count_clicks(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "alice").await;
    let link_id = complete_link(&pool, user_id, "abc").await;
    let repo = PgStatsRepository::new(Arc::new(pool));

    assert_eq!(repo.count_clicks(link_id).await.unwrap(), 0);

    for _ in 0..3 {
        repo.record_click(link_id).await.unwrap();
    }

    assert_eq!(repo.count_clicks(link_id).await.unwrap(), 3);
}

#[sqlx::test]
async fn test_record_click_for_missing_link(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool));

    assert!(repo.record_click(999_999).await.is_err());
}

#[sqlx::test]
async fn test_user_link_stats(pool: PgPool) {
    let alice = common::create_test_user(&pool, "alice").await;
    let bob = common::create_test_user(&pool, "bob").await;
    let busy = complete_link(&pool, alice, "busy").await;
    let quiet = complete_link(&pool, alice, "quiet").await;
    let foreign = complete_link(&pool, bob, "foreign").await;
    let repo = PgStatsRepository::new(Arc::new(pool));

    repo.record_click(busy).await.unwrap();
    repo.record_click(busy).await.unwrap();
    repo.record_click(foreign).await.unwrap();

    let stats = repo.user_link_stats(alice).await.unwrap();

    assert_eq!(stats.len(), 2);
    // newest first
    assert_eq!(stats[0].link_id, quiet);
    assert_eq!(stats[0].clicks, 0);
    assert_eq!(stats[1].link_id, busy);
    assert_eq!(stats[1].clicks, 2);
    assert_eq!(stats[1].code, "busy");
}
