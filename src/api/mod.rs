//! HTTP surface of tinylink.
//!
//! Handlers stay thin: they extract and validate input, call into
//! [`crate::application::services`] and map the result to a DTO.
//! [`routes::router`] wires the public redirect and health routes next to
//! the bearer-protected `/api/links` tree.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
