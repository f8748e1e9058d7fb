//! In-memory backing store for endpoints and captured requests.
//!
//! All shared state lives behind a single `RwLock`; the relay is
//! otherwise stateless between calls. Slug uniqueness is enforced
//! here, at the storage layer, so callers can treat collisions as a
//! retryable condition.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub type EndpointId = Uuid;
pub type RequestId = Uuid;

/// Opaque owning-principal reference supplied by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        OwnerId(s.to_string())
    }
}

/// A user-owned capture target identified by a public slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: EndpointId,
    /// Never exposed through the public slug lookup.
    pub owner: OwnerId,
    pub name: String,
    pub slug: String,
    pub active: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// An immutable record of one inbound HTTP request to an endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRequest {
    pub id: RequestId,
    pub endpoint_id: EndpointId,
    /// Whatever the sender used, unnormalized.
    pub method: String,
    /// Last value wins on duplicate header names; the transport folds them.
    pub headers: HashMap<String, String>,
    /// None when the payload was zero-length.
    pub body: Option<String>,
    /// Byte length of the original payload, independent of any JSON
    /// re-serialization applied to `body`.
    pub body_size: u64,
    /// Arrival time in epoch milliseconds, chosen by the receiver.
    pub timestamp: i64,
}

/// Slug collision against the uniqueness index. Retryable.
#[derive(Debug)]
pub struct SlugTaken;

#[derive(Default)]
struct StoreInner {
    endpoints: HashMap<EndpointId, Endpoint>,
    /// Uniqueness index: slug -> endpoint.
    slugs: HashMap<String, EndpointId>,
    requests: HashMap<RequestId, CapturedRequest>,
    /// Insertion-ordered request ids per endpoint.
    by_endpoint: HashMap<EndpointId, Vec<RequestId>>,
}

/// Backing store shared by the ingest and dashboard surfaces.
#[derive(Default)]
pub struct RelayStore {
    inner: RwLock<StoreInner>,
}

impl RelayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an endpoint, enforcing slug uniqueness.
    pub fn insert_endpoint(&self, endpoint: Endpoint) -> Result<(), SlugTaken> {
        let mut inner = self.inner.write();
        if inner.slugs.contains_key(&endpoint.slug) {
            return Err(SlugTaken);
        }
        inner.slugs.insert(endpoint.slug.clone(), endpoint.id);
        inner.endpoints.insert(endpoint.id, endpoint);
        Ok(())
    }

    pub fn get_endpoint(&self, id: EndpointId) -> Option<Endpoint> {
        self.inner.read().endpoints.get(&id).cloned()
    }

    /// Resolve a public slug. Unauthenticated callers use this; the
    /// owner field on the result must not leak past the router.
    pub fn find_by_slug(&self, slug: &str) -> Option<Endpoint> {
        let inner = self.inner.read();
        let id = inner.slugs.get(slug)?;
        inner.endpoints.get(id).cloned()
    }

    pub fn list_endpoints_for(&self, owner: &OwnerId) -> Vec<Endpoint> {
        let inner = self.inner.read();
        let mut endpoints: Vec<Endpoint> = inner
            .endpoints
            .values()
            .filter(|e| &e.owner == owner)
            .cloned()
            .collect();
        endpoints.sort_by_key(|e| e.created_at);
        endpoints
    }

    pub fn count_endpoints_for(&self, owner: &OwnerId) -> usize {
        self.inner
            .read()
            .endpoints
            .values()
            .filter(|e| &e.owner == owner)
            .count()
    }

    /// Apply a name and/or active patch. Returns the updated endpoint.
    pub fn update_endpoint(
        &self,
        id: EndpointId,
        name: Option<String>,
        active: Option<bool>,
    ) -> Option<Endpoint> {
        let mut inner = self.inner.write();
        let endpoint = inner.endpoints.get_mut(&id)?;
        if let Some(name) = name {
            endpoint.name = name;
        }
        if let Some(active) = active {
            endpoint.active = active;
        }
        Some(endpoint.clone())
    }

    /// Delete an endpoint and cascade-delete its captured requests.
    pub fn delete_endpoint(&self, id: EndpointId) -> Option<Endpoint> {
        let mut inner = self.inner.write();
        let endpoint = inner.endpoints.remove(&id)?;
        inner.slugs.remove(&endpoint.slug);
        if let Some(request_ids) = inner.by_endpoint.remove(&id) {
            for request_id in request_ids {
                inner.requests.remove(&request_id);
            }
        }
        Some(endpoint)
    }

    pub fn insert_request(&self, request: CapturedRequest) {
        let mut inner = self.inner.write();
        inner
            .by_endpoint
            .entry(request.endpoint_id)
            .or_default()
            .push(request.id);
        inner.requests.insert(request.id, request);
    }

    pub fn get_request(&self, id: RequestId) -> Option<CapturedRequest> {
        self.inner.read().requests.get(&id).cloned()
    }

    pub fn count_requests(&self, endpoint_id: EndpointId) -> usize {
        self.inner
            .read()
            .by_endpoint
            .get(&endpoint_id)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }

    /// Captured requests for an endpoint, newest first.
    pub fn list_requests(&self, endpoint_id: EndpointId) -> Vec<CapturedRequest> {
        let inner = self.inner.read();
        let Some(ids) = inner.by_endpoint.get(&endpoint_id) else {
            return Vec::new();
        };
        ids.iter()
            .rev()
            .filter_map(|id| inner.requests.get(id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(owner: &str, slug: &str) -> Endpoint {
        Endpoint {
            id: Uuid::new_v4(),
            owner: owner.into(),
            name: "test".to_string(),
            slug: slug.to_string(),
            active: true,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    fn request(endpoint_id: EndpointId, timestamp: i64) -> CapturedRequest {
        CapturedRequest {
            id: Uuid::new_v4(),
            endpoint_id,
            method: "POST".to_string(),
            headers: HashMap::new(),
            body: None,
            body_size: 0,
            timestamp,
        }
    }

    #[test]
    fn test_slug_uniqueness_enforced() {
        let store = RelayStore::new();
        store.insert_endpoint(endpoint("alice", "abcd1234")).unwrap();
        assert!(store.insert_endpoint(endpoint("bob", "abcd1234")).is_err());
        // A different slug goes through
        store.insert_endpoint(endpoint("bob", "zzzz9999")).unwrap();
    }

    #[test]
    fn test_find_by_slug() {
        let store = RelayStore::new();
        let ep = endpoint("alice", "abcd1234");
        let id = ep.id;
        store.insert_endpoint(ep).unwrap();

        assert_eq!(store.find_by_slug("abcd1234").unwrap().id, id);
        assert!(store.find_by_slug("missing1").is_none());
    }

    #[test]
    fn test_update_endpoint_patch_semantics() {
        let store = RelayStore::new();
        let ep = endpoint("alice", "abcd1234");
        let id = ep.id;
        store.insert_endpoint(ep).unwrap();

        let updated = store.update_endpoint(id, Some("renamed".into()), None).unwrap();
        assert_eq!(updated.name, "renamed");
        assert!(updated.active);

        let updated = store.update_endpoint(id, None, Some(false)).unwrap();
        assert_eq!(updated.name, "renamed");
        assert!(!updated.active);

        assert!(store.update_endpoint(Uuid::new_v4(), None, None).is_none());
    }

    #[test]
    fn test_delete_cascades_requests() {
        let store = RelayStore::new();
        let ep = endpoint("alice", "abcd1234");
        let id = ep.id;
        store.insert_endpoint(ep).unwrap();

        let req = request(id, 1);
        let req_id = req.id;
        store.insert_request(req);
        assert_eq!(store.count_requests(id), 1);

        store.delete_endpoint(id).unwrap();
        assert!(store.get_endpoint(id).is_none());
        assert!(store.get_request(req_id).is_none());
        // Slug becomes available again
        store.insert_endpoint(endpoint("bob", "abcd1234")).unwrap();
    }

    #[test]
    fn test_list_requests_newest_first() {
        let store = RelayStore::new();
        let ep = endpoint("alice", "abcd1234");
        let id = ep.id;
        store.insert_endpoint(ep).unwrap();

        store.insert_request(request(id, 1));
        store.insert_request(request(id, 2));
        store.insert_request(request(id, 3));

        let listed = store.list_requests(id);
        let timestamps: Vec<i64> = listed.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![3, 2, 1]);
    }

    #[test]
    fn test_list_endpoints_scoped_to_owner() {
        let store = RelayStore::new();
        store.insert_endpoint(endpoint("alice", "aaaa1111")).unwrap();
        store.insert_endpoint(endpoint("alice", "aaaa2222")).unwrap();
        store.insert_endpoint(endpoint("bob", "bbbb1111")).unwrap();

        assert_eq!(store.list_endpoints_for(&"alice".into()).len(), 2);
        assert_eq!(store.count_endpoints_for(&"bob".into()), 1);
        assert_eq!(store.count_endpoints_for(&"carol".into()), 0);
    }
}
