//! Bearer-token guard for the management API.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Who is calling. Handlers take it as `Extension<CurrentOwner>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentOwner {
    pub owner_id: i64,
    pub token_id: i64,
}

/// Guards the `/api` routes.
///
/// Reads `Authorization: Bearer <token>`, resolves it through
/// [`AuthService::authenticate`](crate::application::services::AuthService::authenticate)
/// and stores the resulting [`CurrentOwner`] in the request extensions. A
/// missing header, a malformed one, an unknown token and a revoked token all
/// end in the same `401` with `WWW-Authenticate: Bearer`.
pub async fn layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => token,
        Err(_) => {
            return Err(AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({ "reason": "missing or malformed bearer token" }),
            ));
        }
    };

    let authenticated = state.auth_service.authenticate(&token).await?;
    parts.extensions.insert(CurrentOwner {
        owner_id: authenticated.owner_id,
        token_id: authenticated.id,
    });

    Ok(next.run(Request::from_parts(parts, body)).await)
}
