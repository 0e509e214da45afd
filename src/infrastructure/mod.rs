//! Adapters to PostgreSQL and Redis.
//!
//! [`persistence`] implements the repository traits from
//! [`crate::domain::repositories`] on top of `sqlx`; [`cache`] holds the
//! optional lookup cache for redirects.

pub mod cache;
pub mod persistence;
