//! Header sanitation for replayed requests.
//!
//! Connection-management and framing headers captured from the
//! original delivery must not be replayed verbatim; the transport
//! layer sets correct values for the new connection itself.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// Headers stripped from a captured request before replay,
/// matched case-insensitively.
const STRIPPED_HEADERS: [&str; 9] = [
    "host",
    "connection",
    "content-length",
    "transfer-encoding",
    "keep-alive",
    "upgrade",
    "proxy-authorization",
    "te",
    "trailer",
];

/// Build the outbound header map from captured headers, dropping the
/// connection-management set and anything that no longer forms a
/// valid header.
pub fn sanitize_replay_headers(captured: &HashMap<String, String>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (key, value) in captured {
        if STRIPPED_HEADERS
            .iter()
            .any(|stripped| key.eq_ignore_ascii_case(stripped))
        {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_strips_connection_management_headers() {
        let headers = sanitize_replay_headers(&captured(&[
            ("Host", "original.example.com"),
            ("Content-Length", "42"),
            ("Transfer-Encoding", "chunked"),
            ("Connection", "keep-alive"),
            ("Keep-Alive", "timeout=5"),
            ("Upgrade", "websocket"),
            ("Proxy-Authorization", "Basic xxx"),
            ("TE", "trailers"),
            ("Trailer", "Expires"),
            ("content-type", "application/json"),
        ]));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn test_strip_is_case_insensitive() {
        let headers = sanitize_replay_headers(&captured(&[("HOST", "x"), ("CoNtEnT-LeNgTh", "1")]));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_application_headers_pass_through() {
        let headers = sanitize_replay_headers(&captured(&[
            ("x-webhook-signature", "sha256=abc"),
            ("user-agent", "github-hookshot"),
        ]));
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("x-webhook-signature").unwrap(), "sha256=abc");
    }

    #[test]
    fn test_invalid_header_values_dropped() {
        let headers = sanitize_replay_headers(&captured(&[("x-bad", "line\nbreak")]));
        assert!(headers.is_empty());
    }
}
