//! Public webhook ingestion: slug routing and capture.

pub mod handler;
pub mod server;

pub use server::IngestServer;
