//! Inbound webhook handling.
//!
//! Senders are third parties, not users: whatever goes wrong past
//! routing, they only ever see a generic status code. Which quota was
//! hit, and any other internal detail, is reserved for the dashboard.

use crate::api::types::{error_response, json_response};
use crate::body::encode_payload;
use crate::context::RelayContext;
use crate::error::RelayError;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error};

/// Handle one inbound webhook delivery.
///
/// Accepts any HTTP method on `/hooks/{slug}`. The endpoint's active
/// state is checked here at routing and again inside the recorder;
/// both must hold independently since the endpoint can be deactivated
/// in between.
pub async fn handle_webhook(
    req: Request<Incoming>,
    ctx: Arc<RelayContext>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();

    let Some(slug) = parse_slug(&path) else {
        return Ok(error_response(StatusCode::NOT_FOUND, "Not Found"));
    };

    let Some(endpoint) = ctx.store.find_by_slug(slug) else {
        return Ok(error_response(StatusCode::NOT_FOUND, "Endpoint not found"));
    };

    if !endpoint.active {
        return Ok(error_response(StatusCode::FORBIDDEN, "Endpoint is inactive"));
    }

    let method = req.method().to_string();

    // Fold headers, last value wins on duplicates
    let mut headers: HashMap<String, String> = HashMap::new();
    for (key, value) in req.headers() {
        headers.insert(
            key.as_str().to_string(),
            value.to_str().unwrap_or("").to_string(),
        );
    }
    let content_type = headers.get("content-type").cloned();

    // A broken body stream captures as an empty body, never a failure
    let payload = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => Bytes::new(),
    };
    let (body, body_size) = encode_payload(&payload, content_type.as_deref());
    let timestamp = chrono::Utc::now().timestamp_millis();

    let result = ctx
        .recorder
        .record(endpoint.id, method.clone(), headers, body, body_size, timestamp);

    Ok(match result {
        Ok(request_id) => {
            debug!(slug, %method, request_id = %request_id, "Webhook captured");
            json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
        }
        Err(RelayError::QuotaExceeded { .. }) => error_response(
            StatusCode::TOO_MANY_REQUESTS,
            &format!(
                "Free tier limit of {} captured requests per endpoint reached. \
                 Upgrade to keep capturing.",
                ctx.recorder.free_request_limit()
            ),
        ),
        Err(RelayError::EndpointNotFound) => {
            error_response(StatusCode::NOT_FOUND, "Endpoint not found")
        }
        Err(RelayError::EndpointInactive) => {
            error_response(StatusCode::FORBIDDEN, "Endpoint is inactive")
        }
        Err(e) => {
            error!(slug, "Capture failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    })
}

/// Extract the slug from `/hooks/{slug}`. Anything else is not a
/// webhook path.
fn parse_slug(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/hooks/")?;
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    Some(rest)
}
