//! Handler modules for the dashboard API.

pub mod endpoints;
pub mod replay;
pub mod requests;
pub mod system;
