//! The replay flow.
//!
//! Target and network failures are always returned as data
//! (`ReplayOutcome.error`), never raised, so the dashboard renders
//! "attempt completed, here is why it failed" uniformly. Only a
//! missing source request raises.

use super::client::HttpClient;
use super::headers::sanitize_replay_headers;
use crate::config::ReplayConfig;
use crate::error::RelayError;
use crate::guard::{validate_target, FORBIDDEN_TARGET_MESSAGE};
use crate::store::{CapturedRequest, RelayStore, RequestId};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, Uri};
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of one replay attempt. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    /// Destination status, or 0 when the attempt could not complete.
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    /// Populated exclusively on failure.
    pub error: Option<String>,
}

/// A replay failure split into what the user may see and what goes to
/// the log. Keeping the fields apart makes the sanitization a type
/// property instead of string scrubbing.
struct ReplayFailure {
    public: String,
    detail: Option<String>,
}

impl ReplayFailure {
    fn new(public: impl Into<String>) -> Self {
        Self {
            public: public.into(),
            detail: None,
        }
    }

    fn with_detail(public: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            public: public.into(),
            detail: Some(detail.into()),
        }
    }

    fn into_outcome(self) -> ReplayOutcome {
        if let Some(detail) = &self.detail {
            warn!(%detail, "Replay failed");
        }
        ReplayOutcome {
            status: 0,
            status_text: String::new(),
            headers: HashMap::new(),
            body: None,
            error: Some(self.public),
        }
    }
}

pub struct ReplayExecutor {
    store: Arc<RelayStore>,
    client: HttpClient,
    config: ReplayConfig,
}

impl ReplayExecutor {
    pub fn new(store: Arc<RelayStore>, client: HttpClient, config: ReplayConfig) -> Self {
        Self {
            store,
            client,
            config,
        }
    }

    /// Re-issue a captured request against `target_url`, single shot,
    /// no retry.
    pub async fn replay(
        &self,
        request_id: RequestId,
        target_url: &str,
    ) -> Result<ReplayOutcome, RelayError> {
        let captured = self
            .store
            .get_request(request_id)
            .ok_or(RelayError::RequestNotFound)?;

        // Guard runs strictly before any network I/O
        let uri = match validate_target(target_url, self.config.allow_private_targets) {
            Ok(uri) => uri,
            Err(err) => return Ok(ReplayFailure::new(err.to_string()).into_outcome()),
        };

        let outbound = match build_outbound(&captured, uri) {
            Ok(req) => req,
            Err(reason) => return Ok(ReplayFailure::new(reason).into_outcome()),
        };

        debug!(%request_id, target = target_url, method = %captured.method, "Replaying request");

        // One deadline covers the send and the body read together, so
        // the configured bound holds for the whole attempt
        let deadline =
            tokio::time::Instant::now() + Duration::from_secs(self.config.timeout_secs);
        let response = match tokio::time::timeout_at(deadline, self.client.request(outbound)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Ok(transport_failure(&err).into_outcome()),
            Err(_) => {
                return Ok(ReplayFailure::new(format!(
                    "Replay timed out after {}s",
                    self.config.timeout_secs
                ))
                .into_outcome())
            }
        };

        let status = response.status();
        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(key.as_str().to_string(), value.to_string());
            }
        }

        let is_json = headers
            .get("content-type")
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        let body_bytes = match tokio::time::timeout_at(deadline, response.into_body().collect())
            .await
        {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(err)) => {
                return Ok(ReplayFailure::with_detail(
                    "Failed to read response from target",
                    err.to_string(),
                )
                .into_outcome())
            }
            Err(_) => {
                return Ok(ReplayFailure::new(format!(
                    "Replay timed out after {}s",
                    self.config.timeout_secs
                ))
                .into_outcome())
            }
        };

        let body = if body_bytes.is_empty() {
            None
        } else {
            let text = String::from_utf8_lossy(&body_bytes).to_string();
            if is_json {
                Some(prettify_response_body(text))
            } else {
                Some(text)
            }
        };

        // Any received status, 4xx/5xx included, is the target's own
        // response, not a failure of the replay mechanism
        Ok(ReplayOutcome {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body,
            error: None,
        })
    }
}

/// Build the outbound request: captured method and headers (minus the
/// connection-management set), body omitted for GET/HEAD.
fn build_outbound(
    captured: &CapturedRequest,
    uri: Uri,
) -> Result<Request<Full<Bytes>>, String> {
    let method = Method::from_bytes(captured.method.as_bytes())
        .map_err(|_| format!("Captured method {:?} is not a valid HTTP method", captured.method))?;

    let include_body = method != Method::GET && method != Method::HEAD;
    let body = match (&captured.body, include_body) {
        (Some(body), true) => Full::new(Bytes::from(body.clone())),
        _ => Full::new(Bytes::new()),
    };

    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .map_err(|e| format!("Failed to build replay request: {e}"))?;

    *request.headers_mut() = sanitize_replay_headers(&captured.headers);
    Ok(request)
}

/// Pretty-print a declared-JSON response body. A target that declares
/// JSON but returns something else still gets its payload through
/// verbatim; the outcome reports what was actually sent.
fn prettify_response_body(text: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(text),
        Err(_) => text,
    }
}

/// Turn a transport-level error into a single-line public message.
///
/// Some hosting networks refuse private targets at the transport
/// layer rather than in the guard; those refusals are rewritten to the
/// guard's own guidance. Everything else is collapsed to the first
/// line of the error chain, with the full chain kept for the log.
fn transport_failure(err: &dyn StdError) -> ReplayFailure {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    let detail = chain.join(": ");

    let lowered = detail.to_lowercase();
    if lowered.contains("forbidden") || lowered.contains("private network") {
        return ReplayFailure::with_detail(FORBIDDEN_TARGET_MESSAGE, detail);
    }

    // The innermost cause reads best (e.g. "Connection refused")
    let public = chain
        .last()
        .map(|line| line.lines().next().unwrap_or(line).trim().to_string())
        .unwrap_or_else(|| "Replay failed".to_string());

    ReplayFailure::with_detail(public, detail)
}
