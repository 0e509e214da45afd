//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx with
//! bound parameters.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, lookup and the click counter
//! - [`PgClickRepository`] - Append-only click events
//! - [`PgTokenRepository`] - API tokens and owners

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_token_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
