//! Principal resolution for the dashboard API.
//!
//! The relay treats authentication as an opaque collaborator: a
//! provider turns request headers into an owner id or nothing.
//! Webhook ingestion never goes through this; senders are not users.

use crate::store::OwnerId;
use hyper::HeaderMap;
use std::collections::HashMap;

/// Resolves the current caller from request headers.
pub trait AuthProvider: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Option<OwnerId>;
}

/// Bearer-token table from the config file.
pub struct TokenAuthProvider {
    tokens: HashMap<String, OwnerId>,
}

impl TokenAuthProvider {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, owner)| (token, OwnerId(owner)))
                .collect(),
        }
    }
}

impl AuthProvider for TokenAuthProvider {
    fn authenticate(&self, headers: &HeaderMap) -> Option<OwnerId> {
        let value = headers.get(hyper::header::AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{HeaderValue, AUTHORIZATION};

    fn provider() -> TokenAuthProvider {
        TokenAuthProvider::new(HashMap::from([(
            "secret-token".to_string(),
            "alice".to_string(),
        )]))
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_bearer_token() {
        let owner = provider().authenticate(&headers("Bearer secret-token"));
        assert_eq!(owner, Some("alice".into()));
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(provider().authenticate(&headers("Bearer wrong")), None);
    }

    #[test]
    fn test_missing_bearer_prefix() {
        assert_eq!(provider().authenticate(&headers("secret-token")), None);
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(provider().authenticate(&HeaderMap::new()), None);
    }
}
