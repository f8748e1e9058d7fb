//! Endpoint CRUD handlers.

use crate::api::types::*;
use crate::context::RelayContext;
use crate::store::{EndpointId, OwnerId};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;

/// POST /api/endpoints - create an endpoint for the caller
pub async fn handle_create(
    req: Request<Incoming>,
    caller: OwnerId,
    ctx: Arc<RelayContext>,
) -> Response<Full<Bytes>> {
    let body = match collect_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e),
    };

    let create: CreateEndpointRequest = match serde_json::from_slice(&body) {
        Ok(c) => c,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid endpoint JSON: {e}"))
        }
    };

    if create.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Endpoint name must not be empty");
    }

    match ctx.endpoints.create(caller, create.name.trim().to_string()) {
        Ok(endpoint) => json_response(StatusCode::CREATED, &EndpointView::from(endpoint)),
        Err(e) => relay_error_response(&e),
    }
}

/// GET /api/endpoints - list the caller's endpoints
pub fn handle_list(caller: OwnerId, ctx: Arc<RelayContext>) -> Response<Full<Bytes>> {
    let endpoints = ctx
        .endpoints
        .list(&caller)
        .into_iter()
        .map(EndpointView::from)
        .collect();
    json_response(StatusCode::OK, &ListEndpointsResponse { endpoints })
}

/// GET /api/endpoints/:id
pub fn handle_get(
    id: EndpointId,
    caller: OwnerId,
    ctx: Arc<RelayContext>,
) -> Response<Full<Bytes>> {
    match ctx.endpoints.get(&caller, id) {
        Ok(endpoint) => json_response(StatusCode::OK, &EndpointView::from(endpoint)),
        Err(e) => relay_error_response(&e),
    }
}

/// PATCH /api/endpoints/:id - rename and/or toggle active
pub async fn handle_update(
    id: EndpointId,
    req: Request<Incoming>,
    caller: OwnerId,
    ctx: Arc<RelayContext>,
) -> Response<Full<Bytes>> {
    let body = match collect_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e),
    };

    let update: UpdateEndpointRequest = match serde_json::from_slice(&body) {
        Ok(u) => u,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid patch JSON: {e}"))
        }
    };

    match ctx.endpoints.update(&caller, id, update.name, update.active) {
        Ok(endpoint) => json_response(StatusCode::OK, &EndpointView::from(endpoint)),
        Err(e) => relay_error_response(&e),
    }
}

/// DELETE /api/endpoints/:id - delete with cascade
pub fn handle_delete(
    id: EndpointId,
    caller: OwnerId,
    ctx: Arc<RelayContext>,
) -> Response<Full<Bytes>> {
    match ctx.endpoints.delete(&caller, id) {
        Ok(()) => json_response(StatusCode::OK, &serde_json::json!({ "deleted": true })),
        Err(e) => relay_error_response(&e),
    }
}

/// GET /api/endpoints/:id/requests - captured requests, newest first
pub fn handle_list_requests(
    id: EndpointId,
    caller: OwnerId,
    ctx: Arc<RelayContext>,
) -> Response<Full<Bytes>> {
    if let Err(e) = ctx.endpoints.get(&caller, id) {
        return relay_error_response(&e);
    }

    let requests = ctx
        .store
        .list_requests(id)
        .iter()
        .map(RequestSummary::from)
        .collect();
    json_response(StatusCode::OK, &ListRequestsResponse { requests })
}
