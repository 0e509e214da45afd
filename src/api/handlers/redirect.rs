//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::domain::click_event::ClickEvent;
use crate::error::{AppError, LINK_UNAVAILABLE};
use crate::state::AppState;
use crate::utils::client_ip::resolve_client_ip;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (cache first, then database), rejecting expired links
/// 2. Build a click event from `Referer`, `User-Agent` and the client IP
/// 3. Hand the event to the click queue with `try_send` (never waits)
/// 4. Return 302 Found
///
/// A full queue drops the click with a warning; the redirect still succeeds.
///
/// # Errors
///
/// Unknown and expired codes both return 404 with the plain-text body
/// `Link not found or expired`. Other failures use the JSON error format.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let link = match state.link_service.resolve_for_redirect(&code).await {
        Ok(link) => link,
        Err(e) if e.is_unavailable_link() => {
            return (StatusCode::NOT_FOUND, LINK_UNAVAILABLE).into_response();
        }
        Err(e) => return e.into_response(),
    };

    let event = ClickEvent::new(
        link.id,
        link.short_code,
        header_str(&headers, header::REFERER),
        header_str(&headers, header::USER_AGENT),
        resolve_client_ip(&headers, peer, state.behind_proxy),
    );

    enqueue_click(&state, event);

    found(&link.original_url)
}

/// `302 Found` pointing at `location`.
fn found(location: &str) -> Response {
    match HeaderValue::try_from(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => AppError::internal(
            "Stored URL is not a valid Location header",
            json!({ "location": location }),
        )
        .into_response(),
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

fn enqueue_click(state: &AppState, event: ClickEvent) {
    match state.click_sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            warn!(short_code = %event.short_code, "Click queue full, dropping click");
        }
        Err(TrySendError::Closed(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            warn!(short_code = %event.short_code, "Click queue closed, dropping click");
        }
    }
}
