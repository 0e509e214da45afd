//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL owned by an API principal.
///
/// Expiration is never stored as a flag; it is derived from `expires_at`
/// every time the link is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub owner_id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        owner_id: i64,
        original_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        click_count: i64,
    ) -> Self {
        Self {
            id,
            owner_id,
            original_url,
            short_code,
            created_at,
            expires_at,
            click_count,
        }
    }

    /// Returns true if the link has reached its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if `expires_at` is set and is at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Seconds left before expiry, or `None` for links that never expire.
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|e| (e - now).num_seconds())
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub owner_id: i64,
    pub original_url: String,
    pub short_code: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub original_url: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.original_url.is_none() && self.expires_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link_expiring(expires_at: Option<DateTime<Utc>>) -> Link {
        Link::new(
            1,
            7,
            "https://example.com".to_string(),
            "abc123".to_string(),
            Utc::now(),
            expires_at,
            0,
        )
    }

    #[test]
    fn test_link_creation() {
        let link = link_expiring(None);

        assert_eq!(link.id, 1);
        assert_eq!(link.owner_id, 7);
        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.click_count, 0);
        assert!(!link.is_expired());
        assert!(link.seconds_until_expiry(Utc::now()).is_none());
    }

    #[test]
    fn test_link_is_expired_in_the_past() {
        let link = link_expiring(Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired());
    }

    #[test]
    fn test_link_expires_exactly_at_deadline() {
        let now = Utc::now();
        let link = link_expiring(Some(now));

        assert!(link.is_expired_at(now));
        assert!(!link.is_expired_at(now - Duration::milliseconds(1)));
    }

    #[test]
    fn test_link_in_the_future_is_live() {
        let now = Utc::now();
        let link = link_expiring(Some(now + Duration::hours(2)));

        assert!(!link.is_expired_at(now));
        assert_eq!(link.seconds_until_expiry(now), Some(7200));
    }

    #[test]
    fn test_link_patch_is_empty() {
        assert!(LinkPatch::default().is_empty());
        assert!(
            !LinkPatch {
                original_url: None,
                expires_at: Some(None),
            }
            .is_empty()
        );
    }
}
