//! Assembles the full HTTP application.
//!
//! `/{code}` and `/health` are public and not rate limited. Everything
//! under `/api` passes the per-client rate limiter first and the bearer
//! guard second. Request tracing wraps the whole tree, and trailing slashes
//! are trimmed before any route matches.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routed application without path normalization.
///
/// Rate limiting keys on the peer socket address unless
/// `state.behind_proxy` is set, in which case forwarding headers are used.
/// Either way the service must be served with `ConnectInfo<SocketAddr>`.
pub fn router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let api_router = if state.behind_proxy {
        api_router.layer(rate_limit::proxy_layer())
    } else {
        api_router.layer(rate_limit::layer())
    };

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// [`router`] wrapped in trailing-slash normalization, so `/api/links/`
/// and `/api/links` reach the same handler. This is what the server binds.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
