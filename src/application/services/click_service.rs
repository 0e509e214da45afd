//! Click recording and per-link analytics service.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{Click, Link, NewClick};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// One page of a link's click history.
#[derive(Debug, Clone)]
pub struct LinkClicks {
    pub link: Link,
    pub total: i64,
    pub clicks: Vec<Click>,
}

/// Service for recording clicks and reading them back.
///
/// Recording performs two independent writes: the relative counter update on
/// the link, then the append to the click log. They are not wrapped in a
/// transaction, so a failure between the two leaves the counter one ahead.
pub struct ClickService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl ClickService {
    /// Creates a new click service.
    pub fn new(links: Arc<dyn LinkRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Records one traversal of a link, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link was deleted in the meantime.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn record(
        &self,
        link_id: i64,
        referrer: Option<String>,
        user_agent: Option<String>,
        ip: String,
    ) -> Result<Click, AppError> {
        self.store(NewClick {
            link_id,
            clicked_at: Utc::now(),
            referrer,
            user_agent,
            ip,
        })
        .await
    }

    /// Records a click taken off the queue, keeping its redirect timestamp.
    pub async fn record_event(&self, event: ClickEvent) -> Result<Click, AppError> {
        self.store(NewClick::from(event)).await
    }

    async fn store(&self, new_click: NewClick) -> Result<Click, AppError> {
        self.links.increment_click_count(new_click.link_id).await?;
        self.clicks.insert(new_click).await
    }

    /// Returns a newest-first window of clicks for one of the owner's links.
    ///
    /// Expired links stay readable here; only missing links and foreign
    /// links are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Forbidden`] if the link belongs to another owner.
    pub async fn link_clicks(
        &self,
        short_code: &str,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<LinkClicks, AppError> {
        let link = self
            .links
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AppError::link_not_found(short_code))?;

        if link.owner_id != owner_id {
            return Err(AppError::forbidden(
                "Link belongs to another owner",
                serde_json::json!({ "code": short_code }),
            ));
        }

        let total = self.clicks.count_by_link(link.id).await?;
        let clicks = self.clicks.list_by_link(link.id, offset, limit).await?;

        Ok(LinkClicks {
            link,
            total,
            clicks,
        })
    }

    /// Total number of recorded clicks across all links.
    pub async fn count_all(&self) -> Result<i64, AppError> {
        self.clicks.count_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use serde_json::json;

    fn link(owner_id: i64) -> Link {
        Link::new(
            5,
            owner_id,
            "https://example.com".to_string(),
            "abc123".to_string(),
            Utc::now(),
            None,
            2,
        )
    }

    #[tokio::test]
    async fn test_record_increments_then_appends() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();
        let mut seq = mockall::Sequence::new();

        links
            .expect_increment_click_count()
            .withf(|id| *id == 5)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        clicks
            .expect_insert()
            .withf(|c| c.link_id == 5 && c.ip == "10.0.0.1" && c.referrer.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|c| Ok(Click::new(1, c.link_id, c.clicked_at, c.referrer, c.user_agent, c.ip)));

        let service = ClickService::new(Arc::new(links), Arc::new(clicks));
        let click = service
            .record(5, None, Some("curl/8.0".to_string()), "10.0.0.1".to_string())
            .await
            .unwrap();

        assert_eq!(click.link_id, 5);
        assert_eq!(click.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[tokio::test]
    async fn test_record_stops_when_counter_update_fails() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();

        links
            .expect_increment_click_count()
            .returning(|id| Err(AppError::not_found("Link no longer exists", json!({ "link_id": id }))));
        clicks.expect_insert().times(0);

        let service = ClickService::new(Arc::new(links), Arc::new(clicks));
        let err = service
            .record(9, None, None, "10.0.0.1".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_record_event_keeps_redirect_timestamp() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();

        let event = ClickEvent::new(5, "abc123".to_string(), Some("https://ref.example"), None, "1.2.3.4".to_string());
        let clicked_at = event.clicked_at;

        links.expect_increment_click_count().returning(|_| Ok(()));
        clicks
            .expect_insert()
            .withf(move |c| c.clicked_at == clicked_at)
            .times(1)
            .returning(|c| Ok(Click::new(1, c.link_id, c.clicked_at, c.referrer, c.user_agent, c.ip)));

        let service = ClickService::new(Arc::new(links), Arc::new(clicks));
        let click = service.record_event(event).await.unwrap();

        assert_eq!(click.referrer.as_deref(), Some("https://ref.example"));
    }

    #[tokio::test]
    async fn test_link_clicks_for_owner() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();

        links.expect_find_by_code().returning(|_| Ok(Some(link(1))));
        clicks.expect_count_by_link().returning(|_| Ok(2));
        clicks
            .expect_list_by_link()
            .withf(|id, offset, limit| *id == 5 && *offset == 0 && *limit == 10)
            .returning(|id, _, _| {
                Ok(vec![
                    Click::new(2, id, Utc::now(), None, None, "1.1.1.1".to_string()),
                    Click::new(1, id, Utc::now(), None, None, "1.1.1.1".to_string()),
                ])
            });

        let service = ClickService::new(Arc::new(links), Arc::new(clicks));
        let page = service.link_clicks("abc123", 1, 0, 10).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.clicks.len(), 2);
        assert_eq!(page.link.short_code, "abc123");
    }

    #[tokio::test]
    async fn test_link_clicks_rejects_other_owner() {
        let mut links = MockLinkRepository::new();
        let clicks = MockClickRepository::new();

        links.expect_find_by_code().returning(|_| Ok(Some(link(2))));

        let service = ClickService::new(Arc::new(links), Arc::new(clicks));
        let err = service.link_clicks("abc123", 1, 0, 10).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }
}
