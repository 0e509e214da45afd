//! What the redirect handler hands to the click worker.

use chrono::{DateTime, Utc};

/// A followed redirect that has not been written yet.
///
/// Built after the link was resolved, so it carries the link id and never
/// needs another lookup. Sent with `try_send`; when the queue is full the
/// event is dropped. The worker turns it into a
/// [`NewClick`](crate::domain::entities::NewClick).
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub link_id: i64,
    /// Kept for log lines only.
    pub short_code: String,
    pub clicked_at: DateTime<Utc>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: String,
}

impl ClickEvent {
    /// Stamps the event with the current time.
    pub fn new(
        link_id: i64,
        short_code: String,
        referrer: Option<&str>,
        user_agent: Option<&str>,
        ip: String,
    ) -> Self {
        Self {
            link_id,
            short_code,
            clicked_at: Utc::now(),
            referrer: referrer.map(str::to_owned),
            user_agent: user_agent.map(str::to_owned),
            ip,
        }
    }
}
