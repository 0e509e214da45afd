//! DTOs for click event data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Click;

/// Individual click event information.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClickInfo {
    pub clicked_at: DateTime<Utc>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: String,
}

impl From<Click> for ClickInfo {
    fn from(click: Click) -> Self {
        Self {
            clicked_at: click.clicked_at,
            referrer: click.referrer,
            user_agent: click.user_agent,
            ip: click.ip,
        }
    }
}
