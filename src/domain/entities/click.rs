//! Rows of the append-only `link_clicks` table.

use chrono::{DateTime, Utc};

use crate::domain::click_event::ClickEvent;

/// One followed redirect, as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: String,
}

impl Click {
    pub fn new(
        id: i64,
        link_id: i64,
        clicked_at: DateTime<Utc>,
        referrer: Option<String>,
        user_agent: Option<String>,
        ip: String,
    ) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
            referrer,
            user_agent,
            ip,
        }
    }
}

/// A click waiting to be inserted.
///
/// `clicked_at` is the moment the redirect was answered, which can be
/// earlier than the insert when the queue is backed up.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: String,
}

impl From<ClickEvent> for NewClick {
    fn from(event: ClickEvent) -> Self {
        Self {
            link_id: event.link_id,
            clicked_at: event.clicked_at,
            referrer: event.referrer,
            user_agent: event.user_agent,
            ip: event.ip,
        }
    }
}
