//! Handler for per-link click statistics.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::api::dto::clicks::ClickInfo;
use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::stats::LinkStatsResponse;
use crate::api::middleware::CurrentOwner;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the click history of one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/links/{code}/stats?page=1&size=10`
///
/// # Response
///
/// ```json
/// {
///   "short_code": "aZ3k9Q",
///   "total_clicks": 2,
///   "page": 1,
///   "size": 10,
///   "clicks": [
///     {
///       "clicked_at": "2026-03-01T12:00:00Z",
///       "referrer": "https://news.example.com/",
///       "user_agent": "Mozilla/5.0",
///       "ip": "203.0.113.7"
///     }
///   ]
/// }
/// ```
///
/// Expired links keep their history readable here.
///
/// # Errors
///
/// - 404 Not Found: unknown code
/// - 403 Forbidden: link owned by another principal
/// - 400 Bad Request: invalid pagination parameters
pub async fn link_stats_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
    Path(code): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let page = params.validate()?;

    let history = state
        .click_service
        .link_clicks(&code, owner.owner_id, page.offset(), page.limit())
        .await?;

    Ok(Json(LinkStatsResponse {
        short_code: history.link.short_code,
        total_clicks: history.total,
        page: page.page,
        size: page.size,
        clicks: history.clicks.into_iter().map(ClickInfo::from).collect(),
    }))
}
