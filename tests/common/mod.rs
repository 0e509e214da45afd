#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;
use tinylink::application::services::hash_token;
use tinylink::domain::click_event::ClickEvent;
use tinylink::infrastructure::cache::NullCache;
use tinylink::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgTokenRepository,
};
use tinylink::prelude::*;
use tinylink::routes::router;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://tl.example";

/// Token of the owner created by [`create_test_state`].
pub const TOKEN: &str = "test-token";
/// Token of a second owner, for ownership checks.
pub const OTHER_TOKEN: &str = "other-token";

pub async fn create_owner(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO owners (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_token(pool: &PgPool, owner_id: i64, name: &str, raw: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO api_tokens (owner_id, name, token_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(owner_id)
    .bind(name)
    .bind(hash_token(SIGNING_SECRET, raw))
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Creates an owner named `name` holding the bearer token `raw`.
pub async fn create_owner_with_token(pool: &PgPool, name: &str, raw: &str) -> i64 {
    let owner_id = create_owner(pool, name).await;
    create_token(pool, owner_id, name, raw).await;
    owner_id
}

pub async fn create_test_link(pool: &PgPool, owner_id: i64, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (owner_id, short_code, original_url) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(owner_id)
    .bind(code)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_expired_link(pool: &PgPool, owner_id: i64, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (owner_id, short_code, original_url, expires_at) \
         VALUES ($1, $2, $3, NOW() - INTERVAL '1 hour') RETURNING id",
    )
    .bind(owner_id)
    .bind(code)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_click(pool: &PgPool, link_id: i64, ip: &str) {
    sqlx::query("INSERT INTO link_clicks (link_id, ip) VALUES ($1, $2)")
        .bind(link_id)
        .bind(ip)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn click_rows(pool: &PgPool, link_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks WHERE link_id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn click_count(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM links WHERE short_code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let pool = Arc::new(pool);
    let (tx, rx) = mpsc::channel(100);

    let link_repo = Arc::new(PgLinkRepository::new(pool.clone()));
    let click_repo = Arc::new(PgClickRepository::new(pool.clone()));
    let token_repo = Arc::new(PgTokenRepository::new(pool.clone()));

    let cache = Arc::new(NullCache::new());

    let link_service = Arc::new(LinkService::new(link_repo.clone(), cache.clone(), 10));
    let click_service = Arc::new(ClickService::new(link_repo, click_repo));
    let auth_service = Arc::new(AuthService::new(token_repo, SIGNING_SECRET.to_string()));

    let state = AppState {
        link_service,
        click_service,
        auth_service,
        cache,
        click_sender: tx,
        base_url: Some(BASE_URL.to_string()),
        behind_proxy: false,
    };

    (state, rx)
}

/// Full application router served with a fixed peer address.
///
/// Creates owner `alice` holding [`TOKEN`] and owner `bob` holding
/// [`OTHER_TOKEN`]; returns alice's owner id.
pub async fn make_server(pool: PgPool) -> (TestServer, mpsc::Receiver<ClickEvent>, i64) {
    let alice = create_owner_with_token(&pool, "alice", TOKEN).await;
    create_owner_with_token(&pool, "bob", OTHER_TOKEN).await;

    let (state, rx) = create_test_state(pool);
    let app: Router = router(state).layer(MockConnectInfoLayer);

    (TestServer::new(app).unwrap(), rx, alice)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Inserts `ConnectInfo(127.0.0.1:12345)` the way `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
