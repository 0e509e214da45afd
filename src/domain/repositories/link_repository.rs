//! Persistence contract for links.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage for links, implemented by
/// [`PgLinkRepository`](crate::infrastructure::persistence::PgLinkRepository).
///
/// Every method maps database failures to [`AppError::Internal`]; other
/// error cases are listed per method. Writes that take an `owner_id` only
/// ever touch that owner's rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts with `click_count = 0`. The unique index on `short_code`
    /// decides races, so a taken code comes back as [`AppError::Conflict`]
    /// from the insert itself.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Exact-match lookup. Expired links are returned too.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    /// One page of an owner's links, newest first.
    async fn list_by_owner(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError>;

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64, AppError>;

    async fn count_all(&self) -> Result<i64, AppError>;

    /// `Ok(None)` when the owner has no link with this code.
    async fn update(
        &self,
        short_code: &str,
        owner_id: i64,
        patch: LinkPatch,
    ) -> Result<Option<Link>, AppError>;

    /// Removes the link and, through the foreign key, its clicks. `Ok(false)`
    /// when nothing matched.
    async fn delete(&self, short_code: &str, owner_id: i64) -> Result<bool, AppError>;

    /// `click_count = click_count + 1` in a single statement.
    /// [`AppError::NotFound`] once the link is gone.
    async fn increment_click_count(&self, link_id: i64) -> Result<(), AppError>;
}
