//! Owners and API tokens.

use crate::domain::entities::Owner;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A stored bearer token. `token_hash` is HMAC-SHA256 of the raw token
/// keyed with `TOKEN_SIGNING_SECRET`.
#[derive(Debug, Clone)]
pub struct ApiToken {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Storage for owners and their bearer tokens.
///
/// Lookups go by hash only; raw tokens never reach this layer. Unique
/// violations on token name or hash surface as [`AppError::Conflict`], a
/// missing row on revoke as [`AppError::NotFound`], anything else from the
/// database as [`AppError::Internal`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Returns the token with this hash unless it has been revoked.
    async fn find_active_by_hash(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError>;

    async fn update_last_used(&self, token_id: i64) -> Result<(), AppError>;

    /// Get-or-create by owner name.
    async fn ensure_owner(&self, name: &str) -> Result<Owner, AppError>;

    async fn create_token(
        &self,
        owner_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError>;

    /// All tokens, revoked ones included, newest first.
    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError>;

    /// Stamps `revoked_at`; the row is kept for auditing.
    async fn revoke_token(&self, id: i64) -> Result<(), AppError>;
}
