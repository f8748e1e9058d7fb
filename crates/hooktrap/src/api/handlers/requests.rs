//! Captured request inspection handlers.

use crate::api::types::*;
use crate::body::BodyView;
use crate::context::RelayContext;
use crate::store::{OwnerId, RequestId};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use std::sync::Arc;

/// GET /api/requests/:id?view=raw|json|hex
///
/// Ownership is checked through the parent endpoint before any body
/// rendering happens.
pub fn handle_get(
    id: RequestId,
    query: Option<&str>,
    caller: OwnerId,
    ctx: Arc<RelayContext>,
) -> Response<Full<Bytes>> {
    let Some(request) = ctx.store.get_request(id) else {
        return error_response(StatusCode::NOT_FOUND, "Request not found");
    };

    if let Err(e) = ctx.endpoints.get(&caller, request.endpoint_id) {
        return relay_error_response(&e);
    }

    let view = parse_view(query);
    json_response(StatusCode::OK, &RequestDetail::render(request, view))
}

fn parse_view(query: Option<&str>) -> BodyView {
    query
        .and_then(|q| {
            q.split('&')
                .find_map(|pair| pair.strip_prefix("view="))
        })
        .map(BodyView::parse)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view() {
        assert_eq!(parse_view(Some("view=hex")), BodyView::Hex);
        assert_eq!(parse_view(Some("view=json")), BodyView::JsonPretty);
        assert_eq!(parse_view(Some("view=raw")), BodyView::Raw);
        assert_eq!(parse_view(Some("other=1&view=hex")), BodyView::Hex);
        assert_eq!(parse_view(Some("other=1")), BodyView::Raw);
        assert_eq!(parse_view(None), BodyView::Raw);
    }
}
