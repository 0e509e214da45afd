//! DTOs for per-link click statistics.

use serde::{Deserialize, Serialize};

use super::clicks::ClickInfo;

/// Click history of one link, newest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkStatsResponse {
    pub short_code: String,
    pub total_clicks: i64,
    pub page: u32,
    pub size: u32,
    pub clicks: Vec<ClickInfo>,
}
