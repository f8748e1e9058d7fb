//! Request/response types and helpers for the dashboard API.

use crate::body::{render_body, BodyView};
use crate::error::RelayError;
use crate::store::{CapturedRequest, Endpoint};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Endpoint as presented to its owner. The owner field itself is
/// implicit (it is the caller) and never serialized.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub active: bool,
    pub created_at: i64,
}

impl From<Endpoint> for EndpointView {
    fn from(endpoint: Endpoint) -> Self {
        Self {
            id: endpoint.id,
            name: endpoint.name,
            slug: endpoint.slug,
            active: endpoint.active,
            created_at: endpoint.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListEndpointsResponse {
    pub endpoints: Vec<EndpointView>,
}

/// Captured request summary for list responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: Uuid,
    pub method: String,
    pub body_size: u64,
    pub timestamp: i64,
}

impl From<&CapturedRequest> for RequestSummary {
    fn from(request: &CapturedRequest) -> Self {
        Self {
            id: request.id,
            method: request.method.clone(),
            body_size: request.body_size,
            timestamp: request.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListRequestsResponse {
    pub requests: Vec<RequestSummary>,
}

/// Full captured request with the body rendered in the selected view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetail {
    pub id: Uuid,
    pub endpoint_id: Uuid,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub body_size: u64,
    pub timestamp: i64,
}

impl RequestDetail {
    pub fn render(request: CapturedRequest, view: BodyView) -> Self {
        Self {
            id: request.id,
            endpoint_id: request.endpoint_id,
            method: request.method,
            headers: request.headers,
            body: render_body(request.body.as_deref(), view),
            body_size: request.body_size,
            timestamp: request.timestamp,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEndpointRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEndpointRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayRequest {
    pub request_id: Uuid,
    pub target_url: String,
}

/// Error body: `code` is present for quota violations so the UI can
/// render upgrade messaging distinctly.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

// =============================================================================
// Response helper functions
// =============================================================================

/// Create a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}

/// Create an error response
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(
        status,
        &ErrorResponse {
            error: message.to_string(),
            code: None,
        },
    )
}

pub fn not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

pub fn unauthorized() -> Response<Full<Bytes>> {
    error_response(StatusCode::UNAUTHORIZED, "Missing or invalid bearer token")
}

/// Map a relay error onto the dashboard API surface.
pub fn relay_error_response(err: &RelayError) -> Response<Full<Bytes>> {
    let status = match err {
        RelayError::EndpointNotFound
        | RelayError::RequestNotFound
        | RelayError::SlugNotFound(_) => StatusCode::NOT_FOUND,
        RelayError::EndpointInactive | RelayError::Unauthorized => StatusCode::FORBIDDEN,
        RelayError::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
        RelayError::InvalidTargetUrl | RelayError::ForbiddenTarget(_) => StatusCode::BAD_REQUEST,
        RelayError::SlugSpaceExhausted(_) | RelayError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let code = match err {
        RelayError::QuotaExceeded { code } => Some(code.as_str().to_string()),
        _ => None,
    };

    json_response(
        status,
        &ErrorResponse {
            error: err.to_string(),
            code,
        },
    )
}

/// Collect request body into bytes
pub async fn collect_body(req: Request<Incoming>) -> Result<Bytes, String> {
    use http_body_util::BodyExt;
    req.collect()
        .await
        .map(|c| c.to_bytes())
        .map_err(|e| format!("Failed to read request body: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuotaCode;

    #[test]
    fn test_error_response_shape() {
        let resp = error_response(StatusCode::BAD_REQUEST, "Test error");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_quota_error_carries_code() {
        let resp = relay_error_response(&RelayError::quota(QuotaCode::FreeEndpointLimitReached));
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_not_found_mapping() {
        let resp = relay_error_response(&RelayError::RequestNotFound);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_endpoint_view_hides_owner() {
        let view = EndpointView::from(Endpoint {
            id: Uuid::new_v4(),
            owner: "alice".into(),
            name: "test".into(),
            slug: "abcd1234".into(),
            active: true,
            created_at: 0,
        });
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("alice"));
        assert!(json.contains("abcd1234"));
    }
}
