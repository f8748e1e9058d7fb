//! Replay target validation (SSRF guard).
//!
//! Classification is textual, on the hostname string, not on
//! DNS-resolved addresses: a public hostname that resolves to a
//! private address is not caught here. That gap is inherited and
//! documented; some hosting networks additionally refuse private
//! targets at the transport layer, which the replay executor maps
//! back to the same user-facing message.

use crate::error::RelayError;
use hyper::Uri;

/// User guidance returned whenever a private target is refused,
/// pre-flight or by the transport.
pub const FORBIDDEN_TARGET_MESSAGE: &str = "Cannot replay to localhost or private IP addresses. \
     The relay runs on public infrastructure and cannot reach local resources. \
     Use a public URL or a tunnel service like ngrok for localhost testing.";

/// Check whether a hostname is localhost or sits in a private range.
///
/// Covers 10.0.0.0/8 and 192.168.0.0/16 by dotted-string prefix and
/// 172.16.0.0/12 by second-octet range. Deliberately not CIDR
/// arithmetic.
pub fn is_localhost_or_private_ip(hostname: &str) -> bool {
    let hostname = hostname.to_lowercase();

    if hostname == "localhost" || hostname == "127.0.0.1" || hostname == "::1" {
        return true;
    }

    if hostname.starts_with("192.168.") {
        return true;
    }

    if hostname.starts_with("10.") {
        return true;
    }

    // 172.16.0.0/12 spans 172.16.x.x through 172.31.x.x
    if hostname.starts_with("172.") {
        if let Some(second) = hostname.split('.').nth(1) {
            if let Ok(octet) = second.parse::<u32>() {
                if (16..=31).contains(&octet) {
                    return true;
                }
            }
        }
    }

    false
}

/// Parse and validate a caller-supplied replay target.
///
/// Runs strictly before any network I/O. `allow_private` skips the
/// private-host classification (development escape hatch), never the
/// parse itself.
pub fn validate_target(target: &str, allow_private: bool) -> Result<Uri, RelayError> {
    let uri: Uri = target.parse().map_err(|_| RelayError::InvalidTargetUrl)?;

    if uri.scheme().is_none() {
        return Err(RelayError::InvalidTargetUrl);
    }
    let host = uri.host().ok_or(RelayError::InvalidTargetUrl)?;
    // hyper keeps IPv6 literals bracketed
    let host = host.trim_start_matches('[').trim_end_matches(']');

    if !allow_private && is_localhost_or_private_ip(host) {
        return Err(RelayError::ForbiddenTarget(
            FORBIDDEN_TARGET_MESSAGE.to_string(),
        ));
    }

    Ok(uri)
}
