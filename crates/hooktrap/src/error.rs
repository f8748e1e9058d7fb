//! Error taxonomy for the relay.
//!
//! Capture-path failures map to generic status codes for webhook
//! senders; detail (which quota was hit, which resource is missing)
//! is only surfaced to authenticated dashboard callers.

use serde::Serialize;

/// Stable machine-readable codes for free-tier limit violations.
///
/// These are serialized verbatim in API error bodies so a UI can
/// render upgrade messaging instead of a generic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuotaCode {
    #[serde(rename = "FREE_ENDPOINT_LIMIT_REACHED")]
    FreeEndpointLimitReached,
    #[serde(rename = "FREE_REQUEST_LIMIT_REACHED")]
    FreeRequestLimitReached,
    #[serde(rename = "FREE_ACTIVATION_DISABLED")]
    FreeActivationDisabled,
}

impl QuotaCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaCode::FreeEndpointLimitReached => "FREE_ENDPOINT_LIMIT_REACHED",
            QuotaCode::FreeRequestLimitReached => "FREE_REQUEST_LIMIT_REACHED",
            QuotaCode::FreeActivationDisabled => "FREE_ACTIVATION_DISABLED",
        }
    }
}

/// Error types for relay operations
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Endpoint not found")]
    EndpointNotFound,
    #[error("No endpoint with slug {0}")]
    SlugNotFound(String),
    #[error("Request not found")]
    RequestNotFound,
    #[error("Endpoint is inactive")]
    EndpointInactive,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Free tier limit reached: {}", .code.as_str())]
    QuotaExceeded { code: QuotaCode },
    #[error("Invalid target URL. Please provide a valid URL.")]
    InvalidTargetUrl,
    #[error("{0}")]
    ForbiddenTarget(String),
    #[error("Could not generate a unique slug after {0} attempts")]
    SlugSpaceExhausted(usize),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn quota(code: QuotaCode) -> Self {
        RelayError::QuotaExceeded { code }
    }
}
