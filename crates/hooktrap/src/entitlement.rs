//! Entitlement boundary.
//!
//! The only place tier logic touches the relay. The core consumes a
//! boolean "is this owner elevated" and never talks to a billing
//! provider.

use crate::store::OwnerId;
use std::collections::HashSet;

/// Injected capability answering whether an owner holds elevated
/// entitlement, lifting the free-tier caps.
pub trait EntitlementChecker: Send + Sync {
    fn is_elevated(&self, owner: &OwnerId) -> bool;
}

/// Config-backed checker: a fixed set of elevated owners.
#[derive(Default)]
pub struct StaticEntitlements {
    elevated: HashSet<OwnerId>,
}

impl StaticEntitlements {
    pub fn new(elevated: impl IntoIterator<Item = OwnerId>) -> Self {
        Self {
            elevated: elevated.into_iter().collect(),
        }
    }
}

impl EntitlementChecker for StaticEntitlements {
    fn is_elevated(&self, owner: &OwnerId) -> bool {
        self.elevated.contains(owner)
    }
}
