//! Link creation, resolution and management service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{generate_code, validate_custom_code};

/// Service for creating and resolving shortened links.
///
/// Short code uniqueness is delegated to the repository's atomic insert.
/// A conflict on a generated code triggers a retry with a fresh code; a
/// conflict on a caller-chosen code is returned as is.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    max_code_attempts: usize,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// # Arguments
    ///
    /// - `repository` - link storage
    /// - `cache` - read-through cache for the redirect path
    /// - `max_code_attempts` - how many generated codes to try before giving up
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        max_code_attempts: usize,
    ) -> Self {
        Self {
            repository,
            cache,
            max_code_attempts: max_code_attempts.max(1),
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - destination, must not be empty
    /// - `custom_code` - caller-chosen code; empty is treated as absent
    /// - `ttl` - lifetime from now; `None` means the link never expires
    /// - `owner_id` - principal that owns the link
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - URL is empty
    /// - Custom code has an invalid shape or is reserved
    /// - `ttl` pushes the expiry out of the representable range
    ///
    /// Returns [`AppError::Conflict`] if the custom code is already taken.
    /// Returns [`AppError::Internal`] if randomness fails or every generated
    /// code collided.
    pub async fn create_link(
        &self,
        original_url: &str,
        custom_code: Option<&str>,
        ttl: Option<Duration>,
        owner_id: i64,
    ) -> Result<Link, AppError> {
        let original_url = original_url.trim();
        if original_url.is_empty() {
            return Err(AppError::bad_request(
                "Original URL must not be empty",
                json!({ "field": "original_url" }),
            ));
        }

        let expires_at = match ttl {
            Some(ttl) => Some(Utc::now().checked_add_signed(ttl).ok_or_else(|| {
                AppError::bad_request(
                    "Expiration is out of range",
                    json!({ "field": "expires_in" }),
                )
            })?),
            None => None,
        };

        if let Some(custom) = custom_code.filter(|c| !c.is_empty()) {
            validate_custom_code(custom)?;

            return self
                .repository
                .create(NewLink {
                    owner_id,
                    original_url: original_url.to_string(),
                    short_code: custom.to_string(),
                    expires_at,
                })
                .await;
        }

        for attempt in 1..=self.max_code_attempts {
            let short_code = generate_code()?;

            let result = self
                .repository
                .create(NewLink {
                    owner_id,
                    original_url: original_url.to_string(),
                    short_code,
                    expires_at,
                })
                .await;

            match result {
                Err(AppError::Conflict { .. }) => {
                    debug!(attempt, "Generated short code collided, retrying");
                }
                other => return other,
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "attempts": self.max_code_attempts }),
        ))
    }

    /// Resolves a short code against the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Expired`] if the link's expiry has passed.
    pub async fn resolve(&self, short_code: &str) -> Result<Link, AppError> {
        let link = self
            .repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AppError::link_not_found(short_code))?;

        ensure_live(link)
    }

    /// Resolves a short code for the redirect path, consulting the cache first.
    ///
    /// Cached links are re-checked for expiry on every hit. Cache errors fall
    /// through to the store. A miss writes the link back before returning;
    /// an update or delete landing between the store read and that write can
    /// still leave a stale entry until its TTL runs out.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve`].
    pub async fn resolve_for_redirect(&self, short_code: &str) -> Result<Link, AppError> {
        match self.cache.get_link(short_code).await {
            Ok(Some(link)) => return ensure_live(link),
            Ok(None) => {}
            Err(e) => warn!("Cache error for {}: {}", short_code, e),
        }

        let link = self.resolve(short_code).await?;
        self.populate_cache(&link).await;

        Ok(link)
    }

    /// Resolves a link and checks it belongs to `owner_id`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve`], plus [`AppError::Forbidden`] for a link
    /// owned by someone else.
    pub async fn get_owned_link(&self, short_code: &str, owner_id: i64) -> Result<Link, AppError> {
        let link = self.resolve(short_code).await?;

        if link.owner_id != owner_id {
            return Err(AppError::forbidden(
                "Link belongs to another owner",
                json!({ "code": short_code }),
            ));
        }

        Ok(link)
    }

    /// Lists an owner's links, newest first, with the owner's total link count.
    pub async fn list_links(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Link>, i64), AppError> {
        let links = self
            .repository
            .list_by_owner(owner_id, offset, limit)
            .await?;
        let total = self.repository.count_by_owner(owner_id).await?;

        Ok((links, total))
    }

    /// Applies a partial update to one of the owner's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty patch or an empty URL.
    /// Returns [`AppError::NotFound`] if the owner has no link with this code.
    pub async fn update_link(
        &self,
        short_code: &str,
        owner_id: i64,
        mut patch: LinkPatch,
    ) -> Result<Link, AppError> {
        if let Some(url) = patch.original_url.as_mut() {
            let trimmed = url.trim();
            if trimmed.is_empty() {
                return Err(AppError::bad_request(
                    "Original URL must not be empty",
                    json!({ "field": "original_url" }),
                ));
            }
            *url = trimmed.to_string();
        }

        if patch.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to update",
                json!({ "fields": ["original_url", "expires_in"] }),
            ));
        }

        let link = self
            .repository
            .update(short_code, owner_id, patch)
            .await?
            .ok_or_else(|| AppError::link_not_found(short_code))?;

        self.evict(short_code).await;

        Ok(link)
    }

    /// Deletes one of the owner's links together with its click history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner has no link with this code.
    pub async fn delete_link(&self, short_code: &str, owner_id: i64) -> Result<(), AppError> {
        if !self.repository.delete(short_code, owner_id).await? {
            return Err(AppError::link_not_found(short_code));
        }

        self.evict(short_code).await;

        Ok(())
    }

    /// Total number of links in the store.
    pub async fn count_all(&self) -> Result<i64, AppError> {
        self.repository.count_all().await
    }

    async fn populate_cache(&self, link: &Link) {
        let ttl = match link.seconds_until_expiry(Utc::now()) {
            Some(remaining) if remaining <= 0 => return,
            Some(remaining) => Some(remaining as u64),
            None => None,
        };

        if let Err(e) = self.cache.set_link(link, ttl).await {
            warn!("Failed to cache link {}: {}", link.short_code, e);
        }
    }

    async fn evict(&self, short_code: &str) {
        if let Err(e) = self.cache.invalidate(short_code).await {
            warn!("Failed to invalidate cache for {}: {}", short_code, e);
        }
    }
}

fn ensure_live(link: Link) -> Result<Link, AppError> {
    if link.is_expired() {
        return Err(AppError::Expired {
            code: link.short_code,
        });
    }

    Ok(link)
}
