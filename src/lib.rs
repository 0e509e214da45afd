//! # tinylink
//!
//! Short links with optional expiry and click counting, served by Axum on
//! top of PostgreSQL, with Redis as an optional redirect cache.
//!
//! Requests flow inward: [`api`] extracts and validates, [`application`]
//! enforces ownership and expiry rules, [`domain`] defines entities,
//! repository traits and the click pipeline, and [`infrastructure`]
//! implements those traits against Postgres and Redis.
//!
//! `GET /{code}` answers with `302 Found` and queues the click for the
//! background worker; the response never waits for the write. An expired
//! code answers exactly like one that never existed. Owners manage their
//! links under `/api/links` with bearer tokens issued by the `admin` binary.
//!
//! Runtime settings come from the environment; see [`config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// The services, entities and state most callers need.
pub mod prelude {
    pub use crate::application::services::{AuthService, ClickService, LinkService};
    pub use crate::domain::entities::{Click, Link, NewLink};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
