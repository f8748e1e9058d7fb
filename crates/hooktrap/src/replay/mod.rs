//! Replay Executor: re-issues a captured request against a new target.
//!
//! # Module structure
//!
//! - `client` - shared outbound HTTP client (HTTPS via rustls)
//! - `headers` - connection-management header stripping
//! - `executor` - the replay flow: load, guard, send, report

mod client;
mod executor;
mod headers;

pub use client::{create_http_client, HttpClient};
pub use executor::{ReplayExecutor, ReplayOutcome};
pub use headers::sanitize_replay_headers;
