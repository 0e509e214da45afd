//! Core domain entities.
//!
//! Entities are plain data structures. Creation goes through separate `New*`
//! structs and partial updates through [`LinkPatch`].
//!
//! - [`Link`] - a short code mapped to an original URL
//! - [`Click`] - one recorded redirect
//! - [`Owner`] - the principal that owns links

pub mod click;
pub mod link;
pub mod owner;

pub use click::{Click, NewClick};
pub use link::{Link, LinkPatch, NewLink};
pub use owner::Owner;
