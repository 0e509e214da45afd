//! Handlers for link creation and management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use chrono::{Duration, Utc};
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{
    CreateLinkRequest, CreateLinkResponse, LinkListResponse, LinkResponse, UpdateLinkRequest,
};
use crate::api::dto::pagination::PaginationParams;
use crate::api::middleware::CurrentOwner;
use crate::domain::entities::LinkPatch;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_url::build_short_url;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/some/long/path",
///   "custom_code": "launch",  // optional
///   "expires_in": 24          // optional, hours
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request: empty URL, malformed custom code, `expires_in` out of range
/// - 409 Conflict: custom code already taken
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    payload.validate()?;

    let ttl = payload.expires_in.map(Duration::hours);

    let link = state
        .link_service
        .create_link(
            &payload.original_url,
            payload.custom_code.as_deref(),
            ttl,
            owner.owner_id,
        )
        .await?;

    tracing::info!(short_code = %link.short_code, owner_id = owner.owner_id, "Link created");

    let short_url = build_short_url(state.base_url.as_deref(), &headers, &link.short_code)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse::new(link, short_url)),
    ))
}

/// Returns one of the caller's links with its click counter.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// - 404 Not Found: unknown or expired code
/// - 403 Forbidden: link owned by another principal
pub async fn get_link_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .link_service
        .get_owned_link(&code, owner.owner_id)
        .await?;

    let short_url = build_short_url(state.base_url.as_deref(), &headers, &link.short_code)?;

    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&size=10`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
    Query(params): Query<PaginationParams>,
    headers: HeaderMap,
) -> Result<Json<LinkListResponse>, AppError> {
    let page = params.validate()?;

    let (links, total) = state
        .link_service
        .list_links(owner.owner_id, page.offset(), page.limit())
        .await?;

    let links = links
        .into_iter()
        .map(|link| {
            let short_url =
                build_short_url(state.base_url.as_deref(), &headers, &link.short_code)?;
            Ok(LinkResponse::new(link, short_url))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(Json(LinkListResponse {
        links,
        total,
        page: page.page,
        size: page.size,
    }))
}

/// Changes the destination and/or expiry of one of the caller's links.
///
/// # Endpoint
///
/// `PUT /api/links/{code}` or `PATCH /api/links/{code}`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://new-destination.com",
///   "expires_in": 48   // hours from now; null clears the expiry
/// }
/// ```
///
/// The cache entry for the code is invalidated so redirects pick up the
/// change immediately.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let expires_at = match payload.expires_in {
        None => None,
        Some(None) => Some(None),
        Some(Some(hours)) => Some(Some(
            Utc::now()
                .checked_add_signed(Duration::hours(hours))
                .ok_or_else(|| {
                    AppError::bad_request(
                        "Expiration is out of range",
                        json!({ "field": "expires_in" }),
                    )
                })?,
        )),
    };

    let patch = LinkPatch {
        original_url: payload.original_url,
        expires_at,
    };

    let link = state
        .link_service
        .update_link(&code, owner.owner_id, patch)
        .await?;

    let short_url = build_short_url(state.base_url.as_deref(), &headers, &link.short_code)?;

    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Permanently deletes one of the caller's links and its click history.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the caller owns no link with this code.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .link_service
        .delete_link(&code, owner.owner_id)
        .await?;

    tracing::info!(short_code = %code, owner_id = owner.owner_id, "Link deleted");

    Ok(StatusCode::NO_CONTENT)
}
