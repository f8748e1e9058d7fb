//! Shared wiring for the two HTTP surfaces.

use crate::auth::{AuthProvider, TokenAuthProvider};
use crate::capture::CaptureRecorder;
use crate::config::Config;
use crate::endpoints::EndpointManager;
use crate::entitlement::{EntitlementChecker, StaticEntitlements};
use crate::replay::{create_http_client, ReplayExecutor};
use crate::store::{OwnerId, RelayStore};
use std::sync::Arc;
use std::time::Duration;

/// Everything the ingest and dashboard servers share.
pub struct RelayContext {
    pub store: Arc<RelayStore>,
    pub endpoints: EndpointManager,
    pub recorder: CaptureRecorder,
    pub replayer: ReplayExecutor,
    pub auth: Arc<dyn AuthProvider>,
}

impl RelayContext {
    /// Wire up the relay from configuration with the shipped
    /// collaborator implementations.
    pub fn from_config(config: &Config) -> Arc<Self> {
        let entitlements: Arc<dyn EntitlementChecker> = Arc::new(StaticEntitlements::new(
            config.auth.elevated_owners.iter().cloned().map(OwnerId),
        ));
        let auth: Arc<dyn AuthProvider> =
            Arc::new(TokenAuthProvider::new(config.auth.tokens.clone()));
        Self::build(config, entitlements, auth)
    }

    /// Wire up the relay with injected collaborators (tests swap in
    /// their own entitlement/auth implementations here).
    pub fn build(
        config: &Config,
        entitlements: Arc<dyn EntitlementChecker>,
        auth: Arc<dyn AuthProvider>,
    ) -> Arc<Self> {
        let store = Arc::new(RelayStore::new());
        let client = create_http_client(Duration::from_secs(config.replay.timeout_secs));

        Arc::new(Self {
            store: Arc::clone(&store),
            endpoints: EndpointManager::new(
                Arc::clone(&store),
                Arc::clone(&entitlements),
                config.quota.clone(),
            ),
            recorder: CaptureRecorder::new(
                Arc::clone(&store),
                Arc::clone(&entitlements),
                config.quota.clone(),
            ),
            replayer: ReplayExecutor::new(Arc::clone(&store), client, config.replay.clone()),
            auth,
        })
    }
}
