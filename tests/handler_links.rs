mod common;

use axum::{Extension, Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::Value;
use shorty::api::handlers::{
    delete_link_handler, get_link_handler, list_links_handler, redirect_handler,
};
use shorty::domain::entities::{AuthUser, NewLink};
use shorty::domain::repositories::{LinkRepository, StatsRepository};

/// Link management routes for `user_id` plus the public redirect.
fn make_server(app: &common::TestApp, user_id: i64) -> TestServer {
    let api = Router::new()
        .route("/api/links", get(list_links_handler))
        .route(
            "/api/links/{id}",
            get(get_link_handler).delete(delete_link_handler),
        )
        .layer(Extension(AuthUser { user_id }));
    let router = Router::new()
        .merge(api)
        .route("/{code}", get(redirect_handler))
        .with_state(app.state.clone());
    TestServer::new(router).unwrap()
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_newest_first() {
    let app = common::create_test_app();
    app.store
        .insert_complete_link(1, "https://example.com/1", "one", common::in_days(1));
    app.store
        .insert_complete_link(1, "https://example.com/2", "two", common::in_days(1));
    app.store
        .insert_complete_link(2, "https://example.com/3", "three", common::in_days(1));
    let server = make_server(&app, 1);

    let response = server.get("/api/links").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["code"], "two");
    assert_eq!(body["items"][0]["short_url"], "https://sho.rt/two");
    assert_eq!(body["items"][1]["code"], "one");
    assert!(body["items"][0].get("clicks").is_none());
}

#[tokio::test]
async fn test_list_links_hides_pending() {
    let app = common::create_test_app();
    app.store
        .create(NewLink {
            user_id: 1,
            original_url: "https://example.com".to_string(),
            expires_at: common::in_days(1),
        })
        .await
        .unwrap();
    let server = make_server(&app, 1);

    let body: Value = server.get("/api/links").await.json();

    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_list_links_marks_expired() {
    let app = common::create_test_app();
    app.store.insert_complete_link(
        1,
        "https://example.com",
        "old",
        Utc::now() - Duration::hours(1),
    );
    let server = make_server(&app, 1);

    let body: Value = server.get("/api/links").await.json();

    assert_eq!(body["items"][0]["expired"], true);
}

// ─── GET ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_link_with_clicks() {
    let app = common::create_test_app();
    let link = app
        .store
        .insert_complete_link(1, "https://example.com", "abc", common::in_days(1));
    app.store.record_click(link.id).await.unwrap();
    app.store.record_click(link.id).await.unwrap();
    let server = make_server(&app, 1);

    let response = server.get(&format!("/api/links/{}", link.id)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], link.id);
    assert_eq!(body["original_url"], "https://example.com");
    assert_eq!(body["clicks"], 2);
    assert_eq!(body["expired"], false);
    assert_eq!(body["qr_url"], "https://sho.rt/artifacts/qr_codes/qr_abc.svg");
}

#[tokio::test]
async fn test_get_link_of_other_user_is_not_found() {
    let app = common::create_test_app();
    let link = app
        .store
        .insert_complete_link(2, "https://example.com", "abc", common::in_days(1));
    let server = make_server(&app, 1);

    server
        .get(&format!("/api/links/{}", link.id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_get_link_invalid_id() {
    let app = common::create_test_app();
    let server = make_server(&app, 1);

    let response = server.get("/api/links/not-a-number").await;

    assert!(response.status_code().is_client_error());
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_link_success() {
    let app = common::create_test_app();
    let link = app
        .store
        .insert_complete_link(1, "https://example.com", "abc", common::in_days(1));
    app.store.record_click(link.id).await.unwrap();
    let server = make_server(&app, 1);

    let response = server.delete(&format!("/api/links/{}", link.id)).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(app.store.link(link.id).is_none());
    assert_eq!(app.store.click_rows(link.id), 0);

    server.get("/abc").await.assert_status_not_found();
    server
        .get(&format!("/api/links/{}", link.id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_of_other_user() {
    let app = common::create_test_app();
    let link = app
        .store
        .insert_complete_link(2, "https://example.com", "abc", common::in_days(1));
    let server = make_server(&app, 1);

    server
        .delete(&format!("/api/links/{}", link.id))
        .await
        .assert_status_not_found();

    assert!(app.store.link(link.id).is_some());
}

#[tokio::test]
async fn test_delete_missing_link() {
    let app = common::create_test_app();
    let server = make_server(&app, 1);

    let response = server.delete("/api/links/999").await;

    response.assert_status_not_found();
}
