//! Endpoint lifecycle: create, rename, toggle, delete.
//!
//! Free-tier gating happens here, through the injected entitlement
//! checker, never against a billing client.

use crate::config::QuotaConfig;
use crate::entitlement::EntitlementChecker;
use crate::error::{QuotaCode, RelayError};
use crate::slug::{generate_slug, MAX_SLUG_ATTEMPTS};
use crate::store::{Endpoint, EndpointId, OwnerId, RelayStore};
use std::sync::Arc;
use tracing::{info, warn};

pub struct EndpointManager {
    store: Arc<RelayStore>,
    entitlements: Arc<dyn EntitlementChecker>,
    quota: QuotaConfig,
}

impl EndpointManager {
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

    /// Create an endpoint for the caller. The slug is generated with
    /// a bounded retry loop against the store's uniqueness index.
    pub fn create(&self, owner: OwnerId, name: String) -> Result<Endpoint, RelayError> {
        if !self.entitlements.is_elevated(&owner)
            && self.store.count_endpoints_for(&owner) >= self.quota.free_endpoint_limit
        {
            return Err(RelayError::quota(QuotaCode::FreeEndpointLimitReached));
        }

        for _ in 0..MAX_SLUG_ATTEMPTS {
            let endpoint = Endpoint {
                id: uuid::Uuid::new_v4(),
                owner: owner.clone(),
                name: name.clone(),
                slug: generate_slug(),
                active: true,
                created_at: chrono::Utc::now().timestamp_millis(),
            };
            let slug = endpoint.slug.clone();
            match self.store.insert_endpoint(endpoint.clone()) {
                Ok(()) => {
                    info!(%owner, %slug, "Created endpoint");
                    return Ok(endpoint);
                }
                Err(_) => {
                    warn!(%slug, "Slug collision, retrying");
                }
            }
        }

        Err(RelayError::SlugSpaceExhausted(MAX_SLUG_ATTEMPTS))
    }

    /// Fetch an endpoint the caller owns.
    pub fn get(&self, caller: &OwnerId, id: EndpointId) -> Result<Endpoint, RelayError> {
        let endpoint = self
            .store
            .get_endpoint(id)
            .ok_or(RelayError::EndpointNotFound)?;
        if &endpoint.owner != caller {
            return Err(RelayError::Unauthorized);
        }
        Ok(endpoint)
    }

    pub fn list(&self, caller: &OwnerId) -> Vec<Endpoint> {
        self.store.list_endpoints_for(caller)
    }

    /// Rename and/or toggle. Toggling `active` requires elevated
    /// entitlement; renames are open to every tier.
    pub fn update(
        &self,
        caller: &OwnerId,
        id: EndpointId,
        name: Option<String>,
        active: Option<bool>,
    ) -> Result<Endpoint, RelayError> {
        self.get(caller, id)?;

        if active.is_some() && !self.entitlements.is_elevated(caller) {
            return Err(RelayError::quota(QuotaCode::FreeActivationDisabled));
        }

        self.store
            .update_endpoint(id, name, active)
            .ok_or(RelayError::EndpointNotFound)
    }

    /// Delete an owned endpoint, cascading to its captured requests.
    pub fn delete(&self, caller: &OwnerId, id: EndpointId) -> Result<(), RelayError> {
        self.get(caller, id)?;
        self.store
            .delete_endpoint(id)
            .ok_or(RelayError::EndpointNotFound)?;
        info!(%caller, %id, "Deleted endpoint");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlement::testing::ToggleEntitlements;

    fn setup() -> (Arc<RelayStore>, Arc<ToggleEntitlements>, EndpointManager) {
        let store = Arc::new(RelayStore::new());
        let entitlements = Arc::new(ToggleEntitlements::default());
        let manager = EndpointManager::new(
            Arc::clone(&store),
            entitlements.clone() as Arc<dyn EntitlementChecker>,
            QuotaConfig::default(),
        );
        (store, entitlements, manager)
    }

    #[test]
    fn test_create_generates_unique_slug() {
        let (_, entitlements, manager) = setup();
        entitlements.grant("alice".into());

        let a = manager.create("alice".into(), "one".into()).unwrap();
        let b = manager.create("alice".into(), "two".into()).unwrap();
        assert_ne!(a.slug, b.slug);
        assert_eq!(a.slug.len(), 8);
        assert!(a.active);
    }

    #[test]
    fn test_free_tier_endpoint_cap() {
        let (_, _, manager) = setup();
        manager.create("alice".into(), "one".into()).unwrap();
        match manager.create("alice".into(), "two".into()) {
            Err(RelayError::QuotaExceeded { code }) => {
                assert_eq!(code, QuotaCode::FreeEndpointLimitReached)
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
        // Another owner is unaffected
        manager.create("bob".into(), "one".into()).unwrap();
    }

    #[test]
    fn test_activation_gated() {
        let (_, entitlements, manager) = setup();
        let ep = manager.create("alice".into(), "one".into()).unwrap();

        // Rename is open to the free tier
        let renamed = manager
            .update(&"alice".into(), ep.id, Some("renamed".into()), None)
            .unwrap();
        assert_eq!(renamed.name, "renamed");

        // Toggling requires elevation
        assert!(matches!(
            manager.update(&"alice".into(), ep.id, None, Some(false)),
            Err(RelayError::QuotaExceeded {
                code: QuotaCode::FreeActivationDisabled
            })
        ));

        entitlements.grant("alice".into());
        let toggled = manager
            .update(&"alice".into(), ep.id, None, Some(false))
            .unwrap();
        assert!(!toggled.active);
    }

    #[test]
    fn test_ownership_enforced() {
        let (_, _, manager) = setup();
        let ep = manager.create("alice".into(), "one".into()).unwrap();

        assert!(matches!(
            manager.get(&"bob".into(), ep.id),
            Err(RelayError::Unauthorized)
        ));
        assert!(matches!(
            manager.delete(&"bob".into(), ep.id),
            Err(RelayError::Unauthorized)
        ));
        // Owner can delete
        manager.delete(&"alice".into(), ep.id).unwrap();
        assert!(matches!(
            manager.get(&"alice".into(), ep.id),
            Err(RelayError::EndpointNotFound)
        ));
    }

    #[test]
    fn test_delete_cascades() {
        let (store, _, manager) = setup();
        let ep = manager.create("alice".into(), "one".into()).unwrap();
        store.insert_request(crate::store::CapturedRequest {
            id: uuid::Uuid::new_v4(),
            endpoint_id: ep.id,
            method: "GET".to_string(),
            headers: Default::default(),
            body: None,
            body_size: 0,
            timestamp: 0,
        });

        manager.delete(&"alice".into(), ep.id).unwrap();
        assert_eq!(store.count_requests(ep.id), 0);
    }
}
