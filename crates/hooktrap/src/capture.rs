//! Capture Recorder: persists inbound webhook requests.

use crate::config::QuotaConfig;
use crate::entitlement::EntitlementChecker;
use crate::error::{QuotaCode, RelayError};
use crate::store::{CapturedRequest, EndpointId, RelayStore, RequestId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Records captured requests against endpoints, subject to the
/// owner's entitlement.
pub struct CaptureRecorder {
    store: Arc<RelayStore>,
    entitlements: Arc<dyn EntitlementChecker>,
    quota: QuotaConfig,
}

impl CaptureRecorder {
    pub fn new(
        store: Arc<RelayStore>,
        entitlements: Arc<dyn EntitlementChecker>,
        quota: QuotaConfig,
    ) -> Self {
        Self {
            store,
            entitlements,
            quota,
        }
    }

    /// The configured free-tier cap, for user-facing messaging.
    pub fn free_request_limit(&self) -> usize {
        self.quota.free_request_limit
    }

    /// Persist one inbound request.
    ///
    /// Existence and active state are re-checked here even though the
    /// ingest router already checked them: the endpoint could have
    /// been deactivated or deleted in between. The quota
    /// check-then-insert is not atomic against concurrent ingestion;
    /// near the boundary a burst may land one extra row, which is
    /// accepted.
    pub fn record(
        &self,
        endpoint_id: EndpointId,
        method: String,
        headers: HashMap<String, String>,
        body: Option<String>,
        body_size: u64,
        timestamp: i64,
    ) -> Result<RequestId, RelayError> {
        let endpoint = self
            .store
            .get_endpoint(endpoint_id)
            .ok_or(RelayError::EndpointNotFound)?;

        if !endpoint.active {
            return Err(RelayError::EndpointInactive);
        }

        if !self.entitlements.is_elevated(&endpoint.owner) {
            let held = self.store.count_requests(endpoint_id);
            if held >= self.quota.free_request_limit {
                warn!(
                    endpoint = %endpoint.slug,
                    held,
                    limit = self.quota.free_request_limit,
                    "Capture rejected: free tier request limit reached"
                );
                return Err(RelayError::quota(QuotaCode::FreeRequestLimitReached));
            }
        }

        let request = CapturedRequest {
            id: uuid::Uuid::new_v4(),
            endpoint_id,
            method,
            headers,
            body,
            body_size,
            timestamp,
        };
        let request_id = request.id;
        self.store.insert_request(request);
        debug!(endpoint = %endpoint.slug, %request_id, "Captured request");
        Ok(request_id)
    }
}
