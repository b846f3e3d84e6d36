mod common;

use axum::{Extension, Router, routing::get};
use axum_test::TestServer;
use serde_json::Value;
use shorty::api::handlers::stats_handler;
use shorty::domain::entities::AuthUser;
use shorty::domain::repositories::StatsRepository;

fn make_server(app: &common::TestApp, user_id: i64) -> TestServer {
    let router = Router::new()
        .route("/api/stats", get(stats_handler))
        .layer(Extension(AuthUser { user_id }))
        .with_state(app.state.clone());
    TestServer::new(router).unwrap()
}

#[tokio::test]
async fn test_stats_empty() {
    let app = common::create_test_app();
    let server = make_server(&app, 1);

    let response = server.get("/api/stats").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_links"], 0);
    assert_eq!(body["total_clicks"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_counts_clicks_per_link() {
    let app = common::create_test_app();
    let first = app
        .store
        .insert_complete_link(1, "https://example.com/1", "one", common::in_days(1));
    let second = app
        .store
        .insert_complete_link(1, "https://example.com/2", "two", common::in_days(1));
    for _ in 0..3 {
        app.store.record_click(first.id).await.unwrap();
    }
    app.store.record_click(second.id).await.unwrap();
    let server = make_server(&app, 1);

    let body: Value = server.get("/api/stats").await.json();

    assert_eq!(body["total_links"], 2);
    assert_eq!(body["total_clicks"], 4);

    let items = body["items"].as_array().unwrap();
    let by_id = |id: i64| items.iter().find(|i| i["id"] == id).unwrap();
    assert_eq!(by_id(first.id)["clicks"], 3);
    assert_eq!(by_id(first.id)["short_url"], "https://sho.rt/one");
    assert_eq!(by_id(second.id)["clicks"], 1);
}

#[tokio::test]
async fn test_stats_only_include_own_links() {
    let app = common::create_test_app();
    let other = app
        .store
        .insert_complete_link(2, "https://example.com", "theirs", common::in_days(1));
    app.store.record_click(other.id).await.unwrap();
    app.store
        .insert_complete_link(1, "https://example.com", "mine", common::in_days(1));
    let server = make_server(&app, 1);

    let body: Value = server.get("/api/stats").await.json();

    assert_eq!(body["total_links"], 1);
    assert_eq!(body["total_clicks"], 0);
    assert_eq!(body["items"][0]["clicks"], 0);
}

#[tokio::test]
async fn test_stats_store_failure() {
    let app = common::create_test_app();
    app.store.set_unavailable(true);
    let server = make_server(&app, 1);

    let response = server.get("/api/stats").await;

    response.assert_status_internal_server_error();
}
