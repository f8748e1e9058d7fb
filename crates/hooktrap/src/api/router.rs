//! Route dispatch for the dashboard API.

use crate::api::handlers::{endpoints, replay, requests, system};
use crate::api::types::{error_response, not_found, unauthorized};
use crate::context::RelayContext;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Parsed route for endpoint-specific paths
enum EndpointRoute {
    /// GET/PATCH/DELETE /api/endpoints/:id
    Root,
    /// GET /api/endpoints/:id/requests
    Requests,
}

impl EndpointRoute {
    /// Parse route from path segments after `/api/endpoints/:id`
    fn parse(segments: &[&str]) -> Option<Self> {
        match segments {
            [] => Some(EndpointRoute::Root),
            ["requests"] => Some(EndpointRoute::Requests),
            _ => None,
        }
    }
}

/// Main request router
pub async fn route_request(
    req: Request<Incoming>,
    ctx: Arc<RelayContext>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|s| s.to_string());

    debug!("API: {} {}", method, path);

    // Health is the only unauthenticated route on this surface
    if method == Method::GET && path == "/health" {
        return Ok(system::handle_health());
    }

    let Some(caller) = ctx.auth.authenticate(req.headers()) else {
        return Ok(unauthorized());
    };

    // Endpoint collection
    if path == "/api/endpoints" {
        return Ok(match method {
            Method::GET => endpoints::handle_list(caller, ctx),
            Method::POST => endpoints::handle_create(req, caller, ctx).await,
            _ => not_found(),
        });
    }

    // Individual endpoints
    if let Some(rest) = path.strip_prefix("/api/endpoints/") {
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        let Some((first, remainder)) = segments.split_first() else {
            return Ok(not_found());
        };
        let Ok(id) = first.parse::<Uuid>() else {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                "Invalid endpoint id",
            ));
        };
        let Some(route) = EndpointRoute::parse(remainder) else {
            return Ok(not_found());
        };

        return Ok(match (method, route) {
            (Method::GET, EndpointRoute::Root) => endpoints::handle_get(id, caller, ctx),
            (Method::PATCH, EndpointRoute::Root) => {
                endpoints::handle_update(id, req, caller, ctx).await
            }
            (Method::DELETE, EndpointRoute::Root) => endpoints::handle_delete(id, caller, ctx),
            (Method::GET, EndpointRoute::Requests) => {
                endpoints::handle_list_requests(id, caller, ctx)
            }
            _ => not_found(),
        });
    }

    // Captured requests
    if let Some(rest) = path.strip_prefix("/api/requests/") {
        let Ok(id) = rest.parse::<Uuid>() else {
            return Ok(error_response(StatusCode::BAD_REQUEST, "Invalid request id"));
        };
        return Ok(match method {
            Method::GET => requests::handle_get(id, query.as_deref(), caller, ctx),
            _ => not_found(),
        });
    }

    // Replay invocation
    if path == "/api/replay" {
        return Ok(match method {
            Method::POST => replay::handle_replay(req, caller, ctx).await,
            _ => not_found(),
        });
    }

    Ok(not_found())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_route_parse() {
        assert!(matches!(
            EndpointRoute::parse(&[]),
            Some(EndpointRoute::Root)
        ));
        assert!(matches!(
            EndpointRoute::parse(&["requests"]),
            Some(EndpointRoute::Requests)
        ));
        assert!(EndpointRoute::parse(&["unknown"]).is_none());
        assert!(EndpointRoute::parse(&["requests", "extra"]).is_none());
    }
}
