//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, link_stats_handler,
    list_links_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, to be nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /links`               - Create a short link
/// - `GET    /links`               - List the caller's links (paginated)
/// - `GET    /links/{code}`        - Link details with click counter
/// - `PUT    /links/{code}`        - Update destination and/or expiry
/// - `PATCH  /links/{code}`        - Same as `PUT`
/// - `DELETE /links/{code}`        - Hard-delete a link
/// - `GET    /links/{code}/stats`  - Click history (paginated)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{code}",
            get(get_link_handler)
                .put(update_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/links/{code}/stats", get(link_stats_handler))
}
