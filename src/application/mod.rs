//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services hold repository trait objects and
//! provide a clean API for HTTP handlers and the click worker.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, resolution and management
//! - [`services::click_service::ClickService`] - Click recording and per-link analytics
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
