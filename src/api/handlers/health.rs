//! `GET /health`.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{ComponentCheck, ComponentChecks, HealthResponse, ServiceStatus};
use crate::state::AppState;

/// Probes the database, the click queue and the link cache.
///
/// Answers `200` when every probe passes and `503` with the same body
/// otherwise, so load balancers can act on the status alone:
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 42 links" },
///     "click_queue": { "status": "ok", "message": "Free slots: 10000" },
///     "cache": { "status": "ok", "message": "redis connected" }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let checks = ComponentChecks {
        database: probe_database(&state).await,
        click_queue: probe_click_queue(&state),
        cache: probe_cache(&state).await,
    };

    let (code, status) = if checks.all_ok() {
        (StatusCode::OK, ServiceStatus::Healthy)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ServiceStatus::Degraded)
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };
    (code, Json(body))
}

async fn probe_database(state: &AppState) -> ComponentCheck {
    match state.link_service.count_all().await {
        Ok(links) => ComponentCheck::ok(format!("Connected, {links} links")),
        Err(e) => ComponentCheck::failed(format!("Database error: {e}")),
    }
}

// A closed channel means the click worker is gone.
fn probe_click_queue(state: &AppState) -> ComponentCheck {
    let sender = &state.click_sender;
    if sender.is_closed() {
        ComponentCheck::failed("Click queue is closed")
    } else {
        ComponentCheck::ok(format!("Free slots: {}", sender.capacity()))
    }
}

async fn probe_cache(state: &AppState) -> ComponentCheck {
    match state.cache.backend() {
        "disabled" => ComponentCheck::ok("Cache disabled"),
        backend if state.cache.health_check().await => {
            ComponentCheck::ok(format!("{backend} connected"))
        }
        backend => ComponentCheck::failed(format!("{backend} unreachable")),
    }
}
