//! Owner entity.

use chrono::{DateTime, Utc};

/// A principal that owns short links.
///
/// Requests are attributed to an owner through the API token they present.
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
