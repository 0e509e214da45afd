//! Utility functions for code generation and request handling.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`client_ip`] - Client IP resolution (proxy aware)
//! - [`short_url`] - Public short URL construction

pub mod client_ip;
pub mod code_generator;
pub mod short_url;
