//! Replay invocation handler.

use crate::api::types::*;
use crate::context::RelayContext;
use crate::store::OwnerId;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::info;

/// POST /api/replay - { requestId, targetUrl } -> ReplayOutcome
///
/// The outcome is always 200 from this surface: target and transport
/// failures ride inside the outcome's `error` field. Only a missing
/// or foreign source request produces a non-200.
pub async fn handle_replay(
    req: Request<Incoming>,
    caller: OwnerId,
    ctx: Arc<RelayContext>,
) -> Response<Full<Bytes>> {
    let body = match collect_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e),
    };

    let replay: ReplayRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid replay JSON: {e}"))
        }
    };

    // Ownership check through the parent endpoint before any work
    let Some(captured) = ctx.store.get_request(replay.request_id) else {
        return error_response(StatusCode::NOT_FOUND, "Request not found");
    };
    if let Err(e) = ctx.endpoints.get(&caller, captured.endpoint_id) {
        return relay_error_response(&e);
    }

    info!(request_id = %replay.request_id, target = %replay.target_url, "Replay requested");

    match ctx.replayer.replay(replay.request_id, &replay.target_url).await {
        Ok(outcome) => json_response(StatusCode::OK, &outcome),
        Err(e) => relay_error_response(&e),
    }
}
