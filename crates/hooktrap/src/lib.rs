//! Hooktrap: webhook capture-and-replay relay.
//!
//! Users create endpoints, receive arbitrary inbound HTTP requests on
//! a public slug, inspect the captures, and replay them against a new
//! target URL with SSRF-guarded target validation.

// ===== Core relay modules =====
pub mod body;
pub mod capture;
pub mod endpoints;
pub mod error;
pub mod guard;
pub mod replay;
pub mod slug;
pub mod store;

// ===== Collaborator boundaries =====
pub mod auth;
pub mod entitlement;

// ===== HTTP surfaces and wiring =====
pub mod api;
pub mod config;
pub mod context;
pub mod ingest;
