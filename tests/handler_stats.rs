mod common;

use axum::http::StatusCode;
use common::{OTHER_TOKEN, TOKEN, bearer};
use serde_json::Value;
use sqlx::PgPool;

#[sqlx::test]
async fn test_link_stats_empty(pool: PgPool) {
    let (server, _rx, alice) = common::make_server(pool.clone()).await;
    common::create_test_link(&pool, alice, "stats1", "https://example.com").await;

    let response = server
        .get("/api/links/stats1/stats")
        .add_header("Authorization", bearer(TOKEN))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["short_code"], "stats1");
    assert_eq!(body["total_clicks"], 0);
    assert_eq!(body["clicks"].as_array().unwrap().len(), 0);
}

#[sqlx::test]
async fn test_link_stats_paginates_clicks(pool: PgPool) {
    let (server, _rx, alice) = common::make_server(pool.clone()).await;
    let link_id = common::create_test_link(&pool, alice, "stats2", "https://example.com").await;

    for i in 0..5 {
        common::create_test_click(&pool, link_id, &format!("10.0.0.{i}")).await;
    }

    let response = server
        .get("/api/links/stats2/stats")
        .add_query_param("page", 2)
        .add_query_param("size", 2)
        .add_header("Authorization", bearer(TOKEN))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total_clicks"], 5);
    assert_eq!(body["page"], 2);
    assert_eq!(body["size"], 2);

    let clicks = body["clicks"].as_array().unwrap();
    assert_eq!(clicks.len(), 2);
    // Newest first: page 2 holds the third and second clicks.
    assert_eq!(clicks[0]["ip"], "10.0.0.2");
    assert_eq!(clicks[1]["ip"], "10.0.0.1");
    assert!(clicks[0]["referrer"].is_null());
}

#[sqlx::test]
async fn test_link_stats_readable_after_expiry(pool: PgPool) {
    let (server, _rx, alice) = common::make_server(pool.clone()).await;
    let link_id = common::create_expired_link(&pool, alice, "stats3", "https://example.com").await;
    common::create_test_click(&pool, link_id, "10.0.0.1").await;

    let response = server
        .get("/api/links/stats3/stats")
        .add_header("Authorization", bearer(TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total_clicks"], 1);
}

#[sqlx::test]
async fn test_link_stats_not_found(pool: PgPool) {
    let (server, _rx, _) = common::make_server(pool).await;

    server
        .get("/api/links/nothere/stats")
        .add_header("Authorization", bearer(TOKEN))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_link_stats_owned_by_someone_else(pool: PgPool) {
    let (server, _rx, alice) = common::make_server(pool.clone()).await;
    common::create_test_link(&pool, alice, "stats4", "https://example.com").await;

    server
        .get("/api/links/stats4/stats")
        .add_header("Authorization", bearer(OTHER_TOKEN))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn test_link_stats_requires_token(pool: PgPool) {
    let (server, _rx, alice) = common::make_server(pool.clone()).await;
    common::create_test_link(&pool, alice, "stats5", "https://example.com").await;

    server
        .get("/api/links/stats5/stats")
        .await
        .assert_status_unauthorized();
}
