//! DTOs for link creation and management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Longest accepted expiry, in hours (ten years).
pub const MAX_EXPIRES_IN_HOURS: i64 = 87_600;

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL, stored verbatim.
    #[validate(length(min = 1, max = 2048, message = "original_url must not be empty"))]
    pub original_url: String,

    /// Caller-chosen short code; omitted or empty means generate one.
    pub custom_code: Option<String>,

    /// Lifetime in hours from now.
    #[validate(range(min = 1, max = MAX_EXPIRES_IN_HOURS))]
    pub expires_in: Option<i64>,
}

/// Request body for `PUT|PATCH /api/links/{code}`.
///
/// Only provided fields are changed. An explicit `"expires_in": null` clears
/// the expiry so the link never expires.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "original_url must not be empty"))]
    pub original_url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(range(min = 1, max = MAX_EXPIRES_IN_HOURS))]
    pub expires_in: Option<Option<i64>>,
}

/// Response for a freshly created link.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CreateLinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            original_url: link.original_url,
            short_code: link.short_code,
            short_url,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}

/// Full link representation returned by read and update endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            short_url,
            click_count: link.click_count,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}

/// One page of the caller's links.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
}
