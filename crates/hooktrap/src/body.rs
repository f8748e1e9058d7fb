//! Body codec: payload normalization for storage and view rendering.
//!
//! Inbound payloads are stored as text with byte-accurate size
//! accounting. JSON payloads are canonicalized (whitespace
//! normalized, key order preserved as parsed) when the declared
//! content type says JSON and the payload actually parses; everything
//! else is stored verbatim. Capture never fails on a malformed body.

const BYTES_PER_HEX_ROW: usize = 10;

/// Placeholder shown when a captured request carried no body.
pub const NO_BODY_PLACEHOLDER: &str = "No body";

/// Sentinel returned by the json-pretty view for non-JSON bodies.
pub const INVALID_JSON_SENTINEL: &str = "Invalid JSON";

/// Selected rendering of a stored body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyView {
    #[default]
    Raw,
    JsonPretty,
    Hex,
}

impl BodyView {
    /// Parse a view name from a query parameter. Unknown names fall
    /// back to raw, the dashboard default.
    pub fn parse(name: &str) -> Self {
        match name {
            "json" => BodyView::JsonPretty,
            "hex" => BodyView::Hex,
            _ => BodyView::Raw,
        }
    }
}

/// Normalize an inbound payload for storage.
///
/// Returns the storable body (None when the payload is empty) and the
/// exact byte length of the original payload. The size is measured
/// before any JSON re-serialization so it stays correct under
/// multi-byte encodings and whitespace normalization.
pub fn encode_payload(payload: &[u8], content_type: Option<&str>) -> (Option<String>, u64) {
    let body_size = payload.len() as u64;
    if payload.is_empty() {
        return (None, 0);
    }

    let text = String::from_utf8_lossy(payload).to_string();

    let is_json = content_type
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    let body = if is_json {
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => serde_json::to_string(&value).unwrap_or(text),
            // Declared JSON but unparseable: keep the raw text
            Err(_) => text,
        }
    } else {
        text
    };

    (Some(body), body_size)
}

/// Render a stored body in the requested view.
pub fn render_body(body: Option<&str>, view: BodyView) -> String {
    let Some(body) = body else {
        return NO_BODY_PLACEHOLDER.to_string();
    };

    match view {
        BodyView::Raw => body.to_string(),
        BodyView::JsonPretty => format_json_pretty(body),
        BodyView::Hex => format_hex(body),
    }
}

/// Re-parse the stored string as JSON and pretty-print it, or return
/// the sentinel when the body was never JSON.
pub fn format_json_pretty(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| INVALID_JSON_SENTINEL.to_string())
        }
        Err(_) => INVALID_JSON_SENTINEL.to_string(),
    }
}

/// Byte-level dump: fixed rows of 10 bytes, an uppercase 8-hex-digit
/// offset, space-separated uppercase byte pairs (two-space
/// placeholders past the end), then the printable-ASCII rendering of
/// the same bytes.
pub fn format_hex(body: &str) -> String {
    let bytes = body.as_bytes();
    let mut lines = Vec::new();

    for (row, chunk) in bytes.chunks(BYTES_PER_HEX_ROW).enumerate() {
        let offset = format!("{:08X}", row * BYTES_PER_HEX_ROW);

        let hex: Vec<String> = (0..BYTES_PER_HEX_ROW)
            .map(|idx| match chunk.get(idx) {
                Some(byte) => format!("{byte:02X}"),
                None => "  ".to_string(),
            })
            .collect();

        let ascii: String = (0..BYTES_PER_HEX_ROW)
            .map(|idx| match chunk.get(idx) {
                Some(&byte) if (32..=126).contains(&byte) => byte as char,
                Some(_) => '.',
                None => ' ',
            })
            .collect();

        lines.push(format!("{offset}: {}  {ascii}", hex.join(" ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_stores_none() {
        let (body, size) = encode_payload(b"", Some("application/json"));
        assert_eq!(body, None);
        assert_eq!(size, 0);
    }

    #[test]
    fn test_json_payload_is_canonicalized() {
        let (body, size) = encode_payload(b"{ \"a\" : 1 }", Some("application/json"));
        assert_eq!(body.as_deref(), Some(r#"{"a":1}"#));
        // Size reflects the original payload, not the re-serialization
        assert_eq!(size, 11);
    }

    #[test]
    fn test_json_key_order_preserved() {
        let (body, _) = encode_payload(br#"{"z":1,"a":2}"#, Some("application/json"));
        assert_eq!(body.as_deref(), Some(r#"{"z":1,"a":2}"#));
    }

    #[test]
    fn test_json_content_type_with_charset() {
        let (body, _) = encode_payload(b"{\"a\":1}", Some("application/json; charset=utf-8"));
        assert_eq!(body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_invalid_json_stored_verbatim() {
        let (body, size) = encode_payload(b"{not json", Some("application/json"));
        assert_eq!(body.as_deref(), Some("{not json"));
        assert_eq!(size, 9);
    }

    #[test]
    fn test_non_json_stored_verbatim() {
        let (body, _) = encode_payload(b"{\"a\": 1}", Some("text/plain"));
        assert_eq!(body.as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_multibyte_size_accounting() {
        // "héllo" is 6 bytes but 5 characters
        let (body, size) = encode_payload("héllo".as_bytes(), None);
        assert_eq!(body.as_deref(), Some("héllo"));
        assert_eq!(size, 6);
    }

    #[test]
    fn test_render_none_body() {
        assert_eq!(render_body(None, BodyView::Raw), NO_BODY_PLACEHOLDER);
        assert_eq!(render_body(None, BodyView::JsonPretty), NO_BODY_PLACEHOLDER);
        assert_eq!(render_body(None, BodyView::Hex), NO_BODY_PLACEHOLDER);
    }

    #[test]
    fn test_json_pretty_round_trip() {
        let (stored, _) = encode_payload(br#"{"a":1,"b":[1,2]}"#, Some("application/json"));
        let pretty = render_body(stored.as_deref(), BodyView::JsonPretty);
        let original: serde_json::Value = serde_json::from_str(r#"{"a":1,"b":[1,2]}"#).unwrap();
        let rendered: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(original, rendered);
    }

    #[test]
    fn test_json_pretty_sentinel() {
        assert_eq!(format_json_pretty("plain text"), INVALID_JSON_SENTINEL);
    }

    #[test]
    fn test_views_are_idempotent() {
        let body = r#"{"a":1}"#;
        for view in [BodyView::Raw, BodyView::JsonPretty, BodyView::Hex] {
            assert_eq!(
                render_body(Some(body), view),
                render_body(Some(body), view)
            );
        }
    }

    #[test]
    fn test_hex_exact_row() {
        // Exactly 10 bytes: one line, no placeholders
        let out = format_hex("0123456789");
        assert_eq!(
            out,
            "00000000: 30 31 32 33 34 35 36 37 38 39  0123456789"
        );
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_hex_single_byte_padding() {
        let out = format_hex("A");
        // 9 two-space hex placeholders joined by single spaces, then
        // 9 trailing ascii spaces
        let expected = format!("00000000: 41{}  A{}", " ".repeat(27), " ".repeat(9));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_hex_second_row_offset() {
        let out = format_hex("0123456789A");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("0000000A: 41"));
    }

    #[test]
    fn test_hex_nonprintable_dot() {
        let out = format_hex("\x01");
        assert!(out.contains("01"));
        assert!(out.ends_with(&format!(".{}", " ".repeat(9))));
    }

    #[test]
    fn test_body_view_parse() {
        assert_eq!(BodyView::parse("json"), BodyView::JsonPretty);
        assert_eq!(BodyView::parse("hex"), BodyView::Hex);
        assert_eq!(BodyView::parse("raw"), BodyView::Raw);
        assert_eq!(BodyView::parse("bogus"), BodyView::Raw);
    }
}
