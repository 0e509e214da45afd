//! JSON bodies and query strings of the HTTP API.
//!
//! Request types derive `Deserialize` (and `Validate` where fields have
//! bounds); response types derive `Serialize` and are built from domain
//! entities with `From` conversions.

pub mod clicks;
pub mod health;
pub mod links;
pub mod pagination;
pub mod stats;
