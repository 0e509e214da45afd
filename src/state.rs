//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AuthService, ClickService, LinkService};
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::cache::CacheService;

/// Application state shared across all request handlers.
///
/// Cheap to clone: every field is an `Arc` or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub click_service: Arc<ClickService>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Public prefix for short URLs; the request `Host` is used when unset.
    pub base_url: Option<String>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` when resolving the client IP.
    pub behind_proxy: bool,
}
