mod common;

use sqlx::PgPool;
use std::sync::Arc;
use tinylink::application::services::{AuthService, hash_token};
use tinylink::domain::repositories::TokenRepository;
use tinylink::error::AppError;
use tinylink::infrastructure::persistence::PgTokenRepository;

#[sqlx::test]
async fn test_ensure_owner_is_idempotent(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let first = repo.ensure_owner("marketing").await.unwrap();
    let second = repo.ensure_owner("marketing").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.name, "marketing");
}

#[sqlx::test]
async fn test_create_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let owner = repo.ensure_owner("alice").await.unwrap();

    let token = repo.create_token(owner.id, "cli", "hash123").await.unwrap();

    assert_eq!(token.name, "cli");
    assert_eq!(token.owner_id, owner.id);
    assert_eq!(token.token_hash, "hash123");
    assert!(token.revoked_at.is_none());
    assert!(token.last_used_at.is_none());
}

#[sqlx::test]
async fn test_create_token_duplicate_name(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let owner = repo.ensure_owner("alice").await.unwrap();

    repo.create_token(owner.id, "cli", "hash1").await.unwrap();
    let result = repo.create_token(owner.id, "cli", "hash2").await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_find_active_by_hash(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let owner = repo.ensure_owner("alice").await.unwrap();
    repo.create_token(owner.id, "cli", "validhash").await.unwrap();

    assert!(repo.find_active_by_hash("validhash").await.unwrap().is_some());
    assert!(repo.find_active_by_hash("nonexistent").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_revoked_token_is_not_active(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let owner = repo.ensure_owner("alice").await.unwrap();
    let token = repo
        .create_token(owner.id, "revoked", "revokedhash")
        .await
        .unwrap();

    repo.revoke_token(token.id).await.unwrap();

    assert!(repo.find_active_by_hash("revokedhash").await.unwrap().is_none());
    let stored = repo.find_by_id(token.id).await.unwrap().unwrap();
    assert!(stored.is_revoked());
}

#[sqlx::test]
async fn test_revoke_unknown_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let result = repo.revoke_token(424_242).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let owner = repo.ensure_owner("alice").await.unwrap();
    let token = repo.create_token(owner.id, "cli", "hash").await.unwrap();

    repo.update_last_used(token.id).await.unwrap();

    let stored = repo.find_by_name("cli").await.unwrap().unwrap();
    assert!(stored.last_used_at.is_some());
}

#[sqlx::test]
async fn test_list_tokens(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let owner = repo.ensure_owner("alice").await.unwrap();
    repo.create_token(owner.id, "one", "h1").await.unwrap();
    repo.create_token(owner.id, "two", "h2").await.unwrap();

    let tokens = repo.list_tokens().await.unwrap();

    assert_eq!(tokens.len(), 2);
}

#[sqlx::test]
async fn test_authenticate_against_stored_hash(pool: PgPool) {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool)));
    let owner = repo.ensure_owner("alice").await.unwrap();
    repo.create_token(owner.id, "cli", &hash_token("secret", "raw-token"))
        .await
        .unwrap();

    let auth = AuthService::new(repo, "secret".to_string());

    let token = auth.authenticate("raw-token").await.unwrap();
    assert_eq!(token.owner_id, owner.id);

    let wrong = auth.authenticate("other-token").await;
    assert!(matches!(wrong, Err(AppError::Unauthorized { .. })));
}
