//! Authenticated dashboard API.
//!
//! # Module structure
//!
//! - `router` - path dispatch
//! - `types` - request/response types and response helpers
//! - `handlers` - per-resource handler modules
//! - `server` - accept loop

pub mod handlers;
pub mod router;
pub mod server;
pub mod types;

pub use server::ApiServer;
